use crate::domain::{AccountHandle, Error};
use crate::report::{format_amount, simple_table};

pub const EMPTY_PLACEHOLDER: &str = "NA";

/// One account's portion of a ledger total.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub account: String,
    pub balance: f64,
    pub percentage: f64,
}

/// An ordered, named collection of shared accounts.
///
/// The ledger never mutates its accounts and never caches their balances,
/// so totals always reflect mutations made through any other holder.
#[derive(Debug, Clone)]
pub struct Ledger {
    name: String,
    accounts: Vec<AccountHandle>,
}

impl Ledger {
    pub const KIND: &'static str = "LED";

    pub fn new(name: impl Into<String>, accounts: Vec<AccountHandle>) -> Self {
        Self {
            name: name.into(),
            accounts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accounts(&self) -> &[AccountHandle] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.accounts.iter().map(AccountHandle::balance).sum()
    }

    /// Percentage of the total held by each account, in ledger order.
    ///
    /// Fails with [`Error::EmptyLedgerAggregation`] unless the total is
    /// strictly positive (so also for the empty ledger and a NaN total).
    pub fn shares(&self) -> Result<Vec<Share>, Error> {
        let total = self.total();
        if !(total > 0.0) {
            return Err(Error::EmptyLedgerAggregation {
                ledger: self.name.clone(),
                total,
            });
        }

        Ok(self
            .accounts
            .iter()
            .map(|handle| {
                let acc = handle.borrow();
                Share {
                    account: acc.name().to_string(),
                    balance: acc.balance(),
                    percentage: acc.balance() / total * 100.0,
                }
            })
            .collect())
    }

    pub fn show(&self) {
        print!("{}", self.summary());
    }

    /// Text form of [`Ledger::show`]: the name, then one `<account> <balance>`
    /// line per account.
    pub fn summary(&self) -> String {
        let mut out = format!("{}\n", self.name);
        for handle in &self.accounts {
            let acc = handle.borrow();
            out.push_str(&format!("{} {:?}\n", acc.name(), acc.balance()));
        }
        out
    }

    pub fn pprint(&self, show_currency: bool) {
        print!("{}", self.render(show_currency));
    }

    /// Text form of [`Ledger::pprint`].
    ///
    /// The header currency symbol comes from the first account even when
    /// the ledger mixes currencies.
    pub fn render(&self, show_currency: bool) -> String {
        let mut out = format!("{}\n", self.name);
        let Some(first) = self.accounts.first() else {
            out.push_str(EMPTY_PLACEHOLDER);
            out.push('\n');
            return out;
        };
        let symbol = first.borrow().symbol().to_string();

        let rows = match self.shares() {
            Ok(shares) => {
                let balance_title = if show_currency {
                    format!("Balance ({})", symbol)
                } else {
                    "Balance".to_string()
                };
                let mut rows = vec![vec![
                    "Account".to_string(),
                    balance_title,
                    "Percentage (%)".to_string(),
                ]];
                for (handle, share) in self.accounts.iter().zip(shares) {
                    let label = if show_currency {
                        format!("{} ({})", share.account, handle.borrow().code())
                    } else {
                        share.account
                    };
                    rows.push(vec![
                        label,
                        format_amount(share.balance),
                        format_amount(share.percentage),
                    ]);
                }
                rows
            }
            Err(e) => {
                tracing::debug!(error = %e, "falling back to balance-only table");
                let mut rows = vec![vec![
                    "Account".to_string(),
                    format!("Balance ({})", symbol),
                ]];
                for handle in &self.accounts {
                    let acc = handle.borrow();
                    rows.push(vec![acc.name().to_string(), format_amount(acc.balance())]);
                }
                rows
            }
        };

        out.push_str(&simple_table(rows));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Account;

    fn handle(name: &str, balance: f64) -> AccountHandle {
        Account::new(name, balance, ["test"], "", "blue").into_shared()
    }

    #[test]
    fn total_sums_balances() {
        let ledger = Ledger::new("Assets", vec![handle("A", 100.0), handle("B", 300.0)]);
        assert_eq!(ledger.total(), 400.0);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn empty_ledger_total_is_zero() {
        let ledger = Ledger::new("Empty", Vec::new());
        assert_eq!(ledger.total(), 0.0);
        assert!(ledger.is_empty());
        assert!(matches!(
            ledger.shares(),
            Err(Error::EmptyLedgerAggregation { .. })
        ));
    }

    #[test]
    fn shares_are_percentages_of_total() {
        let ledger = Ledger::new("Assets", vec![handle("A", 100.0), handle("B", 300.0)]);
        let shares = ledger.shares().unwrap();

        assert_eq!(shares[0].account, "A");
        assert_eq!(shares[0].percentage, 25.0);
        assert_eq!(shares[1].percentage, 75.0);
    }

    #[test]
    fn render_includes_percentage_column() {
        let ledger = Ledger::new("Assets", vec![handle("A", 100.0), handle("B", 300.0)]);
        let text = ledger.render(false);

        assert!(text.starts_with("Assets\n"));
        assert!(text.contains("Percentage (%)"));
        assert!(text.contains("25.00"));
        assert!(text.contains("75.00"));
        assert!(text.contains("300.00"));
    }

    #[test]
    fn render_with_currency_suffixes_code_and_symbol() {
        let a = handle("A", 1500.0);
        a.set_code("EUR");
        a.set_symbol("€");
        let ledger = Ledger::new("Assets", vec![a, handle("B", 500.0)]);
        let text = ledger.render(true);

        assert!(text.contains("Balance (€)"));
        assert!(text.contains("A (EUR)"));
        assert!(text.contains("B (USD)"));
        assert!(text.contains("1,500.00"));
    }

    #[test]
    fn render_zero_total_omits_percentage() {
        let ledger = Ledger::new("Net", vec![handle("A", 100.0), handle("B", -100.0)]);
        let text = ledger.render(false);

        assert!(!text.contains("Percentage"));
        assert!(text.contains("Balance ($)"));
        assert!(text.contains("-100.00"));
    }

    #[test]
    fn render_non_finite_total_omits_percentage() {
        let ledger = Ledger::new("Odd", vec![handle("A", f64::NAN), handle("B", 100.0)]);
        assert!(ledger.total().is_nan());
        assert!(matches!(
            ledger.shares(),
            Err(Error::EmptyLedgerAggregation { .. })
        ));

        let text = ledger.render(false);
        assert!(!text.contains("Percentage"));
        assert!(text.contains("NaN"));
        assert!(text.contains("100.00"));

        let ledger = Ledger::new("Inf", vec![handle("A", f64::NEG_INFINITY)]);
        assert!(!ledger.render(false).contains("Percentage"));
    }

    #[test]
    fn summary_lists_names_and_balances() {
        let ledger = Ledger::new("Liabilities", vec![handle("Loans", 30000.0), handle("Bonds", 12.5)]);
        assert_eq!(ledger.summary(), "Liabilities\nLoans 30000.0\nBonds 12.5\n");
        assert_eq!(Ledger::new("Empty", Vec::new()).summary(), "Empty\n");
    }

    #[test]
    fn render_empty_ledger_prints_placeholder() {
        let ledger = Ledger::new("Empty", Vec::new());
        assert_eq!(ledger.render(true), "Empty\nNA\n");
    }

    #[test]
    fn shared_account_propagates_to_every_ledger() {
        let x = handle("X", 10.0);
        let l1 = Ledger::new("L1", vec![x.clone(), handle("Y", 5.0)]);
        let l2 = Ledger::new("L2", vec![x.clone()]);

        x.deposit(50.0).unwrap();

        assert_eq!(l1.total(), 65.0);
        assert_eq!(l2.total(), 60.0);
    }
}
