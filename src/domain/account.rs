use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::debug;

use crate::domain::Error;

pub const DEFAULT_CURRENCY_CODE: &str = "USD";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// A named balance with its full deposit, withdrawal and snapshot history.
///
/// No lower bound is placed on the balance; overdrafts are a valid modeling
/// state. The balance always equals the initial balance plus all deposits
/// minus all withdrawals.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    name: String,
    balance: f64,
    tags: BTreeSet<String>,
    note: String,
    color: String,
    currency_code: String,
    currency_symbol: String,
    deposits: Vec<f64>,
    withdrawals: Vec<f64>,
    snapshots: Vec<f64>, // snapshots[0] is the initial balance
}

impl Account {
    pub const KIND: &'static str = "ACC";

    pub fn new<T, S>(
        name: impl Into<String>,
        initial_balance: f64,
        tags: T,
        note: impl Into<String>,
        color: impl Into<String>,
    ) -> Self
    where
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            balance: initial_balance,
            tags: tags.into_iter().map(Into::into).collect(),
            note: note.into(),
            color: color.into(),
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            deposits: Vec::new(),
            withdrawals: Vec::new(),
            snapshots: vec![initial_balance],
        }
    }

    /// Adds `amount` to the balance. Any finite sign is accepted.
    pub fn deposit(&mut self, amount: f64) -> Result<(), Error> {
        self.check_amount(amount)?;
        self.balance += amount;
        self.deposits.push(amount);
        debug!(account = %self.name, amount, balance = self.balance, "deposit");
        Ok(())
    }

    /// Subtracts `amount` from the balance without any overdraft check.
    pub fn withdraw(&mut self, amount: f64) -> Result<(), Error> {
        self.check_amount(amount)?;
        self.balance -= amount;
        self.withdrawals.push(amount);
        debug!(account = %self.name, amount, balance = self.balance, "withdrawal");
        Ok(())
    }

    pub fn snapshot(&mut self) {
        self.snapshots.push(self.balance);
    }

    fn check_amount(&self, amount: f64) -> Result<(), Error> {
        if amount.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidAmount {
                account: self.name.clone(),
                amount,
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn initial_balance(&self) -> f64 {
        self.snapshots[0]
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn deposits(&self) -> &[f64] {
        &self.deposits
    }

    pub fn withdrawals(&self) -> &[f64] {
        &self.withdrawals
    }

    pub fn snapshots(&self) -> &[f64] {
        &self.snapshots
    }

    pub fn code(&self) -> &str {
        &self.currency_code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.currency_code = code.into();
    }

    pub fn symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.currency_symbol = symbol.into();
    }

    pub fn show(&self) {
        print!("{}", self);
    }

    pub fn into_shared(self) -> AccountHandle {
        AccountHandle::new(self)
    }
}

impl core::fmt::Display for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tags = self.tags.iter().map(String::as_str).collect::<Vec<_>>();
        writeln!(
            f,
            "{} {} {} {:?}",
            Self::KIND,
            self.name,
            tags.join(","),
            self.balance
        )?;
        writeln!(f, "{}", self.note)
    }
}

/// Shared handle to an [`Account`].
///
/// Cloning the handle never copies the account: every clone observes the
/// same balance and history. Handles are `!Send`, so an account can only be
/// mutated from the thread that owns the simulation.
#[derive(Debug, Clone)]
pub struct AccountHandle(Rc<RefCell<Account>>);

impl AccountHandle {
    pub fn new(account: Account) -> Self {
        Self(Rc::new(RefCell::new(account)))
    }

    /// Read access to the whole account. The guard must be dropped before
    /// the account is mutated again.
    pub fn borrow(&self) -> Ref<'_, Account> {
        self.0.borrow()
    }

    pub fn deposit(&self, amount: f64) -> Result<(), Error> {
        self.0.borrow_mut().deposit(amount)
    }

    pub fn withdraw(&self, amount: f64) -> Result<(), Error> {
        self.0.borrow_mut().withdraw(amount)
    }

    pub fn snapshot(&self) {
        self.0.borrow_mut().snapshot();
    }

    pub fn set_code(&self, code: impl Into<String>) {
        self.0.borrow_mut().set_code(code);
    }

    pub fn set_symbol(&self, symbol: impl Into<String>) {
        self.0.borrow_mut().set_symbol(symbol);
    }

    pub fn name(&self) -> String {
        self.0.borrow().name().to_string()
    }

    pub fn balance(&self) -> f64 {
        self.0.borrow().balance()
    }

    pub fn snapshots(&self) -> Ref<'_, [f64]> {
        Ref::map(self.0.borrow(), |acc| acc.snapshots())
    }

    /// True when both handles point at the same account.
    pub fn ptr_eq(&self, other: &AccountHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Account> for AccountHandle {
    fn from(account: Account) -> Self {
        Self::new(account)
    }
}
