use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{info, warn};

use crate::domain::{Account, AccountHandle, BalanceSheet, Error, Ledger};
use crate::ingestion::{AgentRow, Side};

pub const ASSETS_LEDGER: &str = "Assets";
pub const LIABILITIES_LEDGER: &str = "Liabilities";

/// Every agent's balance sheet plus the account registry they draw from.
///
/// Accounts are keyed by name: an account listed under several agents is a
/// single shared account.
#[derive(Debug, Default)]
pub struct Book {
    sheets: Vec<BalanceSheet>,
    accounts: Vec<AccountHandle>,
    by_name: HashMap<String, usize>,
}

#[derive(Default)]
struct Draft {
    assets: Vec<AccountHandle>,
    liabilities: Vec<AccountHandle>,
}

impl Book {
    pub fn from_rows(rows: Vec<AgentRow>) -> Self {
        let mut book = Book::default();
        let mut agents: Vec<(String, Draft)> = Vec::new();

        for row in rows {
            let handle = book.get_or_create_account(&row);
            let idx = match agents.iter().position(|(name, _)| *name == row.agent) {
                Some(idx) => idx,
                None => {
                    agents.push((row.agent.clone(), Draft::default()));
                    agents.len() - 1
                }
            };
            let draft = &mut agents[idx].1;
            match row.side {
                Side::Asset => draft.assets.push(handle),
                Side::Liability => draft.liabilities.push(handle),
            }
        }

        book.sheets = agents
            .into_iter()
            .map(|(name, draft)| {
                BalanceSheet::new(
                    name,
                    Ledger::new(ASSETS_LEDGER, draft.assets),
                    Ledger::new(LIABILITIES_LEDGER, draft.liabilities),
                )
            })
            .collect();

        info!(
            agents = book.sheets.len(),
            accounts = book.accounts.len(),
            "book assembled"
        );
        book
    }

    fn get_or_create_account(&mut self, row: &AgentRow) -> AccountHandle {
        match self.by_name.entry(row.account.clone()) {
            Entry::Occupied(e) => {
                let handle = self.accounts[*e.get()].clone();
                let initial = handle.borrow().initial_balance();
                if initial != row.balance {
                    warn!(
                        account = %row.account,
                        agent = %row.agent,
                        kept = initial,
                        ignored = row.balance,
                        "shared account redeclared with a different balance"
                    );
                }
                handle
            }
            Entry::Vacant(e) => {
                let mut account = Account::new(
                    row.account.clone(),
                    row.balance,
                    row.tag_set(),
                    row.note.clone(),
                    row.color.clone(),
                );
                if let Some(code) = &row.code {
                    account.set_code(code.clone());
                }
                if let Some(symbol) = &row.symbol {
                    account.set_symbol(symbol.clone());
                }
                let handle = account.into_shared();
                e.insert(self.accounts.len());
                self.accounts.push(handle.clone());
                handle
            }
        }
    }

    pub fn sheets(&self) -> &[BalanceSheet] {
        &self.sheets
    }

    /// Distinct accounts in first-declaration order.
    pub fn accounts(&self) -> &[AccountHandle] {
        &self.accounts
    }

    pub fn account(&self, name: &str) -> Result<&AccountHandle, Error> {
        self.by_name
            .get(name)
            .map(|&idx| &self.accounts[idx])
            .ok_or_else(|| Error::UnknownAccount(name.to_string()))
    }

    /// Snapshots every distinct account once.
    pub fn snapshot_all(&self) {
        for handle in &self.accounts {
            handle.snapshot();
        }
    }

    /// Largest snapshot value across all accounts, or zero.
    pub fn max_snapshot(&self) -> f64 {
        self.accounts
            .iter()
            .flat_map(|h| h.snapshots().to_vec())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::read_agents;

    const AGENTS: &str = "agent,side,account,balance,tags,note,color\n\
                          USA,asset,Loan USA->FRA,500,loan,,blue\n\
                          USA,asset,Reserves USA,2000,,,green\n\
                          FRA,liability,Loan USA->FRA,500,loan,,blue\n\
                          FRA,asset,Reserves FRA,800,,,purple\n";

    fn book() -> Book {
        Book::from_rows(read_agents(AGENTS.as_bytes()).unwrap())
    }

    #[test]
    fn agents_keep_declaration_order() {
        let book = book();
        let names: Vec<_> = book.sheets().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["USA", "FRA"]);
        assert_eq!(book.accounts().len(), 3);
        assert_eq!(book.sheets()[1].liabilities().name(), "Liabilities");
    }

    #[test]
    fn repeated_account_names_share_one_account() {
        let book = book();
        let usa_loan = &book.sheets()[0].assets().accounts()[0];
        let fra_loan = &book.sheets()[1].liabilities().accounts()[0];
        assert!(usa_loan.ptr_eq(fra_loan));

        book.account("Loan USA->FRA").unwrap().deposit(100.0).unwrap();

        assert_eq!(book.sheets()[0].assets().total(), 2600.0);
        assert_eq!(book.sheets()[1].liabilities().total(), 600.0);
    }

    #[test]
    fn snapshot_all_touches_each_account_once() {
        let book = book();
        book.snapshot_all();
        for handle in book.accounts() {
            assert_eq!(handle.snapshots().len(), 2);
        }
        assert_eq!(book.max_snapshot(), 2000.0);
    }

    #[test]
    fn unknown_account_is_an_error() {
        assert!(matches!(
            book().account("Gold"),
            Err(Error::UnknownAccount(name)) if name == "Gold"
        ));
    }
}
