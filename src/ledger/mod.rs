//! Ledger Engine
//!
//! The money-movement rules: deposit (card to wallet), bank transfer
//! (wallet to card), account-type-aware payment (wallet to wallet) and
//! investment sale. The engine validates and mutates aggregates that are
//! already loaded into memory; persistence and notification stay with the
//! handlers. Failures that must leave an audit trail append a
//! Failure-status transaction to the initiating account before the error
//! is returned.

use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountType, Amount, Clock, PaymentCategory, Transaction, TransactionDirection,
    WalletError,
};

/// Business constants injected into the engine at construction.
#[derive(Debug, Clone)]
pub struct WalletPolicy {
    /// Opening balance seeded into the Admin account at signup.
    pub admin_initial_balance: Decimal,
    /// Opening balance of every newly attached card.
    pub card_initial_balance: Decimal,
    /// Fixed cost charged to the sender of every payment.
    pub transaction_cost: Decimal,
    /// Fraction of the payment amount returned as a reward.
    pub reward_percentage: Decimal,
    /// Flat bonus granted to charity recipients, funded by the admin pool.
    pub donation_bonus: Decimal,
    /// Minimum payment amount for the sender reward.
    pub sender_reward_threshold: Decimal,
    /// Minimum payment amount for the business recipient reward.
    pub business_reward_threshold: Decimal,
}

impl Default for WalletPolicy {
    fn default() -> Self {
        Self {
            admin_initial_balance: Decimal::new(1_000_000, 0),
            card_initial_balance: Decimal::new(5_000, 0),
            transaction_cost: Decimal::new(5, 0),
            reward_percentage: Decimal::new(2, 2),
            donation_bonus: Decimal::new(10, 0),
            sender_reward_threshold: Decimal::new(500, 0),
            business_reward_threshold: Decimal::new(1_000, 0),
        }
    }
}

/// The two records produced by a successful payment, one per counterparty
/// perspective. Used by the notifier after the aggregates are persisted.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub debit: Transaction,
    pub credit: Transaction,
}

/// Records produced by a successful investment sale.
#[derive(Debug, Clone)]
pub struct InvestmentSaleOutcome {
    pub credit: Transaction,
    pub debit: Transaction,
}

/// The wallet ledger's state-transition rules.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    policy: WalletPolicy,
    clock: Clock,
}

impl LedgerEngine {
    pub fn new(policy: WalletPolicy) -> Self {
        Self {
            policy,
            clock: Clock,
        }
    }

    pub fn policy(&self) -> &WalletPolicy {
        &self.policy
    }

    // =========================================================================
    // Deposit: card -> wallet
    // =========================================================================

    pub fn deposit(
        &self,
        account: &mut Account,
        card_number: i64,
        amount: &Amount,
    ) -> Result<(), WalletError> {
        if !account.account_type().can_initiate_wallet_debit() {
            return Err(WalletError::ReadOnlyAccount(account.phone()));
        }
        if !account.is_active() {
            return Err(WalletError::InactiveAccount(account.phone().to_string()));
        }
        if account.cards().is_empty() {
            return Err(WalletError::NoCardsFound);
        }
        let card = account
            .find_card(card_number)
            .ok_or(WalletError::CardNotFound(card_number))?;
        let card_name = card.name().to_string();
        let card_balance = card.balance();
        let expiry = card.expiry().clone();

        if amount.value() > card_balance {
            let err = WalletError::InsufficientCardBalance;
            let record = Transaction::failure(
                self.clock.stamp(),
                (card_number, &card_name),
                (account.phone(), account.user_name()),
                amount.value(),
                err.to_string(),
            );
            account.record_transaction(record);
            return Err(err);
        }
        if expiry.is_past(self.clock.today()) {
            let err = WalletError::CardExpired(expiry.to_string());
            let record = Transaction::failure(
                self.clock.stamp(),
                (card_number, &card_name),
                (account.phone(), account.user_name()),
                amount.value(),
                err.to_string(),
            );
            account.record_transaction(record);
            return Err(err);
        }

        account.move_card_to_wallet(card_number, amount.value());
        let record = Transaction::success(
            self.clock.stamp(),
            (card_number, &card_name),
            (account.phone(), account.user_name()),
            amount.value(),
            TransactionDirection::Credited,
            None,
            None,
        );
        account.record_transaction(record);
        Ok(())
    }

    // =========================================================================
    // Bank transfer: wallet -> card
    // =========================================================================

    pub fn bank_transfer(
        &self,
        account: &mut Account,
        card_number: i64,
        amount: &Amount,
    ) -> Result<(), WalletError> {
        if !account.account_type().can_initiate_wallet_debit() {
            return Err(WalletError::ReadOnlyAccount(account.phone()));
        }
        if !account.is_active() {
            return Err(WalletError::InactiveAccount(account.phone().to_string()));
        }
        if account.cards().is_empty() {
            return Err(WalletError::NoCardsFound);
        }
        let card = account
            .find_card(card_number)
            .ok_or(WalletError::CardNotFound(card_number))?;
        let card_name = card.name().to_string();
        let expiry = card.expiry().clone();

        if amount.value() > account.balance() {
            let err = WalletError::InsufficientWalletBalance;
            let record = Transaction::failure(
                self.clock.stamp(),
                (account.phone(), account.user_name()),
                (card_number, &card_name),
                amount.value(),
                err.to_string(),
            );
            account.record_transaction(record);
            return Err(err);
        }
        if expiry.is_past(self.clock.today()) {
            let err = WalletError::CardExpired(expiry.to_string());
            let record = Transaction::failure(
                self.clock.stamp(),
                (account.phone(), account.user_name()),
                (card_number, &card_name),
                amount.value(),
                err.to_string(),
            );
            account.record_transaction(record);
            return Err(err);
        }

        account.move_wallet_to_card(card_number, amount.value());
        let record = Transaction::success(
            self.clock.stamp(),
            (account.phone(), account.user_name()),
            (card_number, &card_name),
            amount.value(),
            TransactionDirection::Debited,
            None,
            None,
        );
        account.record_transaction(record);
        Ok(())
    }

    // =========================================================================
    // Payment: wallet -> wallet, account-type-aware
    // =========================================================================

    /// Applies a payment across the three in-memory aggregates. The caller
    /// persists all three as one unit on success, and persists the source
    /// alone when a Failure record was appended to it.
    pub fn payment(
        &self,
        source: &mut Account,
        destination: &mut Account,
        admin: &mut Account,
        amount: &Amount,
    ) -> Result<PaymentOutcome, WalletError> {
        if !source.is_active() {
            return Err(WalletError::InactiveAccount(source.phone().to_string()));
        }
        if !destination.is_active() {
            let err = WalletError::InactiveAccount(destination.phone().to_string());
            let record = Transaction::failure(
                self.clock.stamp(),
                (source.phone(), source.user_name()),
                (destination.phone(), destination.user_name()),
                amount.value(),
                err.to_string(),
            );
            source.record_transaction(record);
            return Err(err);
        }
        if !source.account_type().can_initiate_wallet_debit() {
            return Err(WalletError::ReadOnlyAccount(source.phone()));
        }
        if source.phone() == destination.phone() {
            return Err(WalletError::SelfPayment);
        }
        let total_debit = amount.value() + self.policy.transaction_cost;
        if source.balance() < total_debit {
            let err = WalletError::InsufficientWalletBalance;
            let record = Transaction::failure(
                self.clock.stamp(),
                (source.phone(), source.user_name()),
                (destination.phone(), destination.user_name()),
                amount.value(),
                err.to_string(),
            );
            source.record_transaction(record);
            return Err(err);
        }
        let category = PaymentCategory::for_recipient(destination.account_type())
            .ok_or(WalletError::PayToAdmin)?;

        source.debit(total_debit);
        destination.credit(amount.value());
        admin.credit(self.policy.transaction_cost);

        let mut sender_reward = None;
        if amount.value() >= self.policy.sender_reward_threshold {
            let reward = self.policy.reward_percentage * amount.value();
            source.credit(reward);
            admin.debit(reward);
            source.add_reward(reward);
            admin.add_reward(reward);
            sender_reward = Some(reward);
        }

        let mut recipient_reward = None;
        match category {
            PaymentCategory::Payment => {
                if amount.value() >= self.policy.business_reward_threshold {
                    let reward = self.policy.reward_percentage * amount.value();
                    destination.credit(reward);
                    admin.debit(reward);
                    destination.add_reward(reward);
                    admin.add_reward(reward);
                    recipient_reward = Some(reward);
                }
                source.accumulate(PaymentCategory::Payment, amount.value());
            }
            PaymentCategory::Donation => {
                let bonus = self.policy.donation_bonus;
                destination.credit(bonus);
                admin.debit(bonus);
                destination.add_reward(bonus);
                admin.accumulate(PaymentCategory::Donation, bonus);
                source.accumulate(PaymentCategory::Donation, amount.value());
                let recipient = destination.user_name().to_string();
                source.add_donation_position(&recipient, amount.value());
            }
            PaymentCategory::Bill => {
                source.accumulate(PaymentCategory::Bill, amount.value());
            }
            PaymentCategory::Service => {
                source.accumulate(PaymentCategory::Service, amount.value());
            }
            PaymentCategory::Investment => {
                source.accumulate(PaymentCategory::Investment, amount.value());
                let recipient = destination.user_name().to_string();
                source.add_investment_position(&recipient, amount.value());
            }
            PaymentCategory::Transfer => {
                source.accumulate(PaymentCategory::Transfer, amount.value());
            }
            PaymentCategory::InvestmentSale => {}
        }

        let stamp = self.clock.stamp();
        let debit = Transaction::success(
            stamp.clone(),
            (source.phone(), source.user_name()),
            (destination.phone(), destination.user_name()),
            amount.value(),
            TransactionDirection::Debited,
            Some(category),
            sender_reward,
        );
        let credit = Transaction::success(
            stamp,
            (source.phone(), source.user_name()),
            (destination.phone(), destination.user_name()),
            amount.value(),
            TransactionDirection::Credited,
            Some(PaymentCategory::Transfer),
            recipient_reward,
        );
        source.record_transaction(debit.clone());
        destination.record_transaction(credit.clone());

        Ok(PaymentOutcome { debit, credit })
    }

    // =========================================================================
    // Investment sale: position -> wallet
    // =========================================================================

    pub fn sell_investment(
        &self,
        investor: &mut Account,
        fund: &mut Account,
        amount: &Amount,
    ) -> Result<InvestmentSaleOutcome, WalletError> {
        if !investor.is_active() {
            return Err(WalletError::InactiveAccount(investor.phone().to_string()));
        }
        if !fund.is_active() {
            return Err(WalletError::InactiveAccount(fund.user_name().to_string()));
        }
        if !investor.account_type().can_initiate_wallet_debit() {
            return Err(WalletError::ReadOnlyAccount(investor.phone()));
        }
        if investor.investment_position(fund.user_name()) < amount.value() {
            let err = WalletError::InsufficientInvestmentBalance;
            let record = Transaction::failure(
                self.clock.stamp(),
                (investor.phone(), investor.user_name()),
                (fund.phone(), fund.user_name()),
                amount.value(),
                err.to_string(),
            );
            investor.record_transaction(record);
            return Err(err);
        }

        investor.credit(amount.value());
        investor.accumulate(PaymentCategory::InvestmentSale, amount.value());
        fund.debit(amount.value());
        let fund_name = fund.user_name().to_string();
        investor.reduce_investment_position(&fund_name, amount.value());

        let stamp = self.clock.stamp();
        let credit = Transaction::success(
            stamp.clone(),
            (fund.phone(), fund.user_name()),
            (investor.phone(), investor.user_name()),
            amount.value(),
            TransactionDirection::Credited,
            Some(PaymentCategory::InvestmentSale),
            None,
        );
        let debit = Transaction::success(
            stamp,
            (fund.phone(), fund.user_name()),
            (investor.phone(), investor.user_name()),
            amount.value(),
            TransactionDirection::Debited,
            Some(PaymentCategory::InvestmentSale),
            None,
        );
        investor.record_transaction(credit.clone());
        fund.record_transaction(debit.clone());

        Ok(InvestmentSaleOutcome { credit, debit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, CardExpiry};
    use rust_decimal_macros::dec;

    const CARD: i64 = 4486770098076615;

    fn stamp() -> String {
        "06-08-26, 10:30:00".to_string()
    }

    fn engine() -> LedgerEngine {
        LedgerEngine::new(WalletPolicy::default())
    }

    fn account(phone: i64, name: &str, account_type: AccountType) -> Account {
        let opening = if account_type == AccountType::Admin {
            WalletPolicy::default().admin_initial_balance
        } else {
            Decimal::ZERO
        };
        Account::new(
            phone,
            name.to_string(),
            format!("{phone}@example.com"),
            "hash".to_string(),
            account_type,
            opening,
            stamp(),
        )
    }

    fn personal_with_card() -> Account {
        let mut account = account(6381342954, "Anush Raghavender", AccountType::Personal);
        let card = Card::new(
            CARD,
            "axis",
            WalletPolicy::default().card_initial_balance,
            CardExpiry::new(12, 99).unwrap(),
            "cvv-hash".to_string(),
        );
        account
            .add_card(card, Clock.today(), stamp())
            .unwrap();
        account
    }

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    fn deactivated(mut account: Account) -> Account {
        account.deactivate(stamp());
        account
    }

    // ---------------------------------------------------------------- deposit

    #[test]
    fn test_deposit_moves_card_money_into_wallet() {
        let mut account = personal_with_card();
        engine().deposit(&mut account, CARD, &amount(dec!(500))).unwrap();

        assert_eq!(account.balance(), dec!(500));
        assert_eq!(account.find_card(CARD).unwrap().balance(), dec!(4500));

        let record = account.transactions().last().unwrap();
        assert_eq!(record.type_label(), "Credited");
        assert_eq!(record.status_label(), "Success");
        assert_eq!(record.from_id(), CARD);
        assert_eq!(record.to_id(), 6381342954);
    }

    #[test]
    fn test_deposit_rejects_read_only_types() {
        for account_type in [
            AccountType::Admin,
            AccountType::Business,
            AccountType::Utility,
            AccountType::Service,
            AccountType::Charity,
            AccountType::Investment,
        ] {
            let mut account = account(7000000001, "Some Account", account_type);
            let result = engine().deposit(&mut account, CARD, &amount(dec!(10)));
            assert!(
                matches!(result, Err(WalletError::ReadOnlyAccount(_))),
                "{account_type} should be read only"
            );
            assert!(account.transactions().is_empty());
        }
    }

    #[test]
    fn test_deposit_rejects_inactive_account() {
        let mut account = deactivated(personal_with_card());
        let result = engine().deposit(&mut account, CARD, &amount(dec!(10)));
        assert!(matches!(result, Err(WalletError::InactiveAccount(_))));
        assert!(account.transactions().is_empty());
    }

    #[test]
    fn test_deposit_without_cards() {
        let mut account = account(6381342954, "Anush Raghavender", AccountType::Personal);
        let result = engine().deposit(&mut account, CARD, &amount(dec!(10)));
        assert!(matches!(result, Err(WalletError::NoCardsFound)));
    }

    #[test]
    fn test_deposit_unknown_card() {
        let mut account = personal_with_card();
        let result = engine().deposit(&mut account, 1111222233334444, &amount(dec!(10)));
        assert!(matches!(result, Err(WalletError::CardNotFound(_))));
        assert!(account.transactions().is_empty());
    }

    #[test]
    fn test_deposit_insufficient_card_balance_records_failure() {
        let mut account = personal_with_card();
        let result = engine().deposit(&mut account, CARD, &amount(dec!(100000)));
        assert!(matches!(result, Err(WalletError::InsufficientCardBalance)));

        // No balance moved, one Failure record appended.
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.find_card(CARD).unwrap().balance(), dec!(5000));
        assert_eq!(account.transactions().len(), 1);
        let record = &account.transactions()[0];
        assert!(record.is_failure());
        assert_eq!(record.type_label(), "-");
    }

    /// Simulate a card that expired after it was attached by patching the
    /// persisted document, the same way a stored aggregate ages.
    fn with_expired_card(account: &Account) -> Account {
        let mut doc = serde_json::to_value(account).unwrap();
        doc["cards"][0]["expiry"] = serde_json::Value::String("12/21".to_string());
        serde_json::from_value(doc).unwrap()
    }

    #[test]
    fn test_deposit_expired_card_records_failure() {
        let mut account = with_expired_card(&personal_with_card());

        let result = engine().deposit(&mut account, CARD, &amount(dec!(100)));
        assert!(matches!(result, Err(WalletError::CardExpired(_))));
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.transactions().len(), 1);
        assert!(account.transactions()[0].is_failure());
    }

    // ---------------------------------------------------------- bank transfer

    #[test]
    fn test_bank_transfer_moves_wallet_money_onto_card() {
        let mut account = personal_with_card();
        engine().deposit(&mut account, CARD, &amount(dec!(500))).unwrap();
        engine()
            .bank_transfer(&mut account, CARD, &amount(dec!(200)))
            .unwrap();

        assert_eq!(account.balance(), dec!(300));
        assert_eq!(account.find_card(CARD).unwrap().balance(), dec!(4700));

        let record = account.transactions().last().unwrap();
        assert_eq!(record.type_label(), "Debited");
        assert_eq!(record.from_id(), 6381342954);
        assert_eq!(record.to_id(), CARD);
    }

    #[test]
    fn test_bank_transfer_insufficient_wallet_balance_records_failure() {
        let mut account = personal_with_card();
        let result = engine().bank_transfer(&mut account, CARD, &amount(dec!(200)));
        assert!(matches!(result, Err(WalletError::InsufficientWalletBalance)));
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.find_card(CARD).unwrap().balance(), dec!(5000));
        assert_eq!(account.transactions().len(), 1);
        assert!(account.transactions()[0].is_failure());
    }

    // ---------------------------------------------------------------- payment

    #[test]
    fn test_payment_below_reward_threshold() {
        let mut source = personal_with_card();
        let mut destination = account(7358440894, "Sriman Narayana", AccountType::Business);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(500))).unwrap();

        engine()
            .payment(&mut source, &mut destination, &mut admin, &amount(dec!(100)))
            .unwrap();

        assert_eq!(source.balance(), dec!(395));
        assert_eq!(destination.balance(), dec!(100));
        assert_eq!(admin.balance(), dec!(1_000_005));
        assert_eq!(source.total_payments(), dec!(100));
        assert_eq!(source.rewards(), Decimal::ZERO);
    }

    #[test]
    fn test_payment_sender_reward_above_threshold() {
        let mut source = personal_with_card();
        let mut destination = account(8000000001, "Some Person", AccountType::Personal);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(1000))).unwrap();

        engine()
            .payment(&mut source, &mut destination, &mut admin, &amount(dec!(500)))
            .unwrap();

        // 1000 - 505 + 10 reward
        assert_eq!(source.balance(), dec!(505.00));
        assert_eq!(source.rewards(), dec!(10.00));
        assert_eq!(destination.balance(), dec!(500));
        // +5 fee, -10 reward
        assert_eq!(admin.balance(), dec!(999_995.00));
        assert_eq!(admin.rewards(), dec!(10.00));
        assert_eq!(source.total_transfers(), dec!(500));

        let debit = source.transactions().last().unwrap();
        assert_eq!(debit.type_label(), "Debited (Transfer)");
        assert_eq!(debit.reward_label(), "10.00");
        let credit = destination.transactions().last().unwrap();
        assert_eq!(credit.type_label(), "Credited (Transfer)");
        assert_eq!(credit.reward_label(), "-");
    }

    #[test]
    fn test_payment_business_reward_above_both_thresholds() {
        let mut source = personal_with_card();
        let mut destination = account(7358440894, "Sriman Narayana", AccountType::Business);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(2000))).unwrap();

        engine()
            .payment(&mut source, &mut destination, &mut admin, &amount(dec!(1000)))
            .unwrap();

        // Sender: 2000 - 1005 + 20; recipient: 1000 + 20.
        assert_eq!(source.balance(), dec!(1015.00));
        assert_eq!(destination.balance(), dec!(1020.00));
        assert_eq!(destination.rewards(), dec!(20.00));
        // +5 fee - 20 - 20.
        assert_eq!(admin.balance(), dec!(999_965.00));
        assert_eq!(admin.rewards(), dec!(40.00));
        assert_eq!(source.total_payments(), dec!(1000));
    }

    #[test]
    fn test_payment_conserves_money_across_parties() {
        let mut source = personal_with_card();
        let mut destination = account(7358440894, "Sriman Narayana", AccountType::Business);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(3000))).unwrap();

        let before = source.balance() + destination.balance() + admin.balance();
        engine()
            .payment(&mut source, &mut destination, &mut admin, &amount(dec!(1500)))
            .unwrap();
        let after = source.balance() + destination.balance() + admin.balance();

        assert_eq!(before, after);
    }

    #[test]
    fn test_payment_to_charity_grants_bonus_and_tracks_position() {
        let mut source = personal_with_card();
        let mut charity = account(8500000001, "Helping Hands", AccountType::Charity);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(1000))).unwrap();

        engine()
            .payment(&mut source, &mut charity, &mut admin, &amount(dec!(200)))
            .unwrap();

        assert_eq!(charity.balance(), dec!(210));
        assert_eq!(charity.rewards(), dec!(10));
        assert_eq!(source.total_donations(), dec!(200));
        assert_eq!(source.donation_position("Helping Hands"), dec!(200));
        assert_eq!(admin.total_donations(), dec!(10));

        let debit = source.transactions().last().unwrap();
        assert_eq!(debit.type_label(), "Debited (Donation)");
    }

    #[test]
    fn test_payment_to_utility_and_service_accumulate_totals() {
        let mut source = personal_with_card();
        let mut utility = account(8600000001, "Power Grid", AccountType::Utility);
        let mut service = account(8600000002, "Cab Service", AccountType::Service);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(1000))).unwrap();

        engine()
            .payment(&mut source, &mut utility, &mut admin, &amount(dec!(120)))
            .unwrap();
        engine()
            .payment(&mut source, &mut service, &mut admin, &amount(dec!(80)))
            .unwrap();

        assert_eq!(source.total_bills(), dec!(120));
        assert_eq!(source.total_services(), dec!(80));
    }

    #[test]
    fn test_payment_to_investment_builds_position() {
        let mut source = personal_with_card();
        let mut fund = account(7358440894, "Sriman Narayana", AccountType::Investment);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(1000))).unwrap();

        engine()
            .payment(&mut source, &mut fund, &mut admin, &amount(dec!(300)))
            .unwrap();

        assert_eq!(source.total_investments(), dec!(300));
        assert_eq!(source.investment_position("Sriman Narayana"), dec!(300));
        assert_eq!(fund.balance(), dec!(300));
    }

    #[test]
    fn test_payment_rejects_inactive_source_without_record() {
        let mut source = deactivated(personal_with_card());
        let mut destination = account(8000000001, "Some Person", AccountType::Personal);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);

        let result =
            engine().payment(&mut source, &mut destination, &mut admin, &amount(dec!(10)));
        assert!(matches!(result, Err(WalletError::InactiveAccount(_))));
        assert!(source.transactions().is_empty());
    }

    #[test]
    fn test_payment_inactive_destination_records_failure_on_source() {
        let mut source = personal_with_card();
        let mut destination = deactivated(account(8000000001, "Some Person", AccountType::Personal));
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(500))).unwrap();

        let result =
            engine().payment(&mut source, &mut destination, &mut admin, &amount(dec!(10)));
        assert!(matches!(result, Err(WalletError::InactiveAccount(_))));
        assert_eq!(source.balance(), dec!(500));
        let record = source.transactions().last().unwrap();
        assert!(record.is_failure());
        assert!(destination.transactions().is_empty());
    }

    #[test]
    fn test_payment_insufficient_covers_amount_plus_cost() {
        let mut source = personal_with_card();
        let mut destination = account(8000000001, "Some Person", AccountType::Personal);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(100))).unwrap();

        // 100 >= 98 but 100 < 98 + 5.
        let result =
            engine().payment(&mut source, &mut destination, &mut admin, &amount(dec!(98)));
        assert!(matches!(result, Err(WalletError::InsufficientWalletBalance)));
        assert_eq!(source.balance(), dec!(100));
        assert!(source.transactions().last().unwrap().is_failure());
    }

    #[test]
    fn test_payment_to_admin_rejected() {
        let mut source = personal_with_card();
        let mut admin_dest = account(9999999999, "Swift Pay", AccountType::Admin);
        let mut admin = admin_dest.clone();
        engine().deposit(&mut source, CARD, &amount(dec!(500))).unwrap();

        let result =
            engine().payment(&mut source, &mut admin_dest, &mut admin, &amount(dec!(10)));
        assert!(matches!(result, Err(WalletError::PayToAdmin)));
        assert_eq!(source.balance(), dec!(500));
    }

    #[test]
    fn test_payment_to_self_rejected() {
        let mut source = personal_with_card();
        let mut same = source.clone();
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut source, CARD, &amount(dec!(500))).unwrap();

        let result = engine().payment(&mut source, &mut same, &mut admin, &amount(dec!(10)));
        assert!(matches!(result, Err(WalletError::SelfPayment)));
        assert_eq!(source.balance(), dec!(500));
    }

    // ------------------------------------------------------------------- sale

    fn invested_pair() -> (Account, Account, Account) {
        let mut investor = personal_with_card();
        let mut fund = account(7358440894, "Sriman Narayana", AccountType::Investment);
        let mut admin = account(9999999999, "Swift Pay", AccountType::Admin);
        engine().deposit(&mut investor, CARD, &amount(dec!(1000))).unwrap();
        engine()
            .payment(&mut investor, &mut fund, &mut admin, &amount(dec!(500)))
            .unwrap();
        (investor, fund, admin)
    }

    #[test]
    fn test_sell_investment_round_trip() {
        let (mut investor, mut fund, _admin) = invested_pair();
        let wallet_before = investor.balance();

        engine()
            .sell_investment(&mut investor, &mut fund, &amount(dec!(500)))
            .unwrap();

        assert_eq!(investor.balance(), wallet_before + dec!(500));
        assert_eq!(investor.investment_position("Sriman Narayana"), dec!(0));
        assert_eq!(investor.total_investments(), dec!(0));
        assert_eq!(fund.balance(), dec!(0));

        let credit = investor.transactions().last().unwrap();
        assert_eq!(credit.type_label(), "Credited (Investment Sale)");
        let debit = fund.transactions().last().unwrap();
        assert_eq!(debit.type_label(), "Debited (Investment Sale)");
    }

    #[test]
    fn test_sell_more_than_position_records_failure() {
        let (mut investor, mut fund, _admin) = invested_pair();

        engine()
            .sell_investment(&mut investor, &mut fund, &amount(dec!(500)))
            .unwrap();
        let result = engine().sell_investment(&mut investor, &mut fund, &amount(dec!(500)));

        assert!(matches!(
            result,
            Err(WalletError::InsufficientInvestmentBalance)
        ));
        assert!(investor.transactions().last().unwrap().is_failure());
    }

    #[test]
    fn test_sell_with_no_position_fails() {
        let mut investor = personal_with_card();
        let mut fund = account(7358440894, "Sriman Narayana", AccountType::Investment);

        let result = engine().sell_investment(&mut investor, &mut fund, &amount(dec!(100)));
        assert!(matches!(
            result,
            Err(WalletError::InsufficientInvestmentBalance)
        ));
    }

    #[test]
    fn test_sell_rejects_inactive_fund_without_record() {
        let (mut investor, fund, _admin) = invested_pair();
        let mut fund = deactivated(fund);
        let record_count = investor.transactions().len();

        let result = engine().sell_investment(&mut investor, &mut fund, &amount(dec!(100)));
        assert!(matches!(result, Err(WalletError::InactiveAccount(_))));
        assert_eq!(investor.transactions().len(), record_count);
    }
}
