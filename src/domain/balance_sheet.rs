use crate::domain::{Chart, Error, Ledger, Series, traits::ChartSurface};

/// A named pair of ledgers: assets and liabilities.
///
/// Nothing forces the two sides to balance; an imbalance is an ordinary,
/// observable state.
#[derive(Debug, Clone)]
pub struct BalanceSheet {
    name: String,
    assets: Ledger,
    liabilities: Ledger,
}

impl BalanceSheet {
    pub const KIND: &'static str = "BAL";

    pub fn new(name: impl Into<String>, assets: Ledger, liabilities: Ledger) -> Self {
        Self {
            name: name.into(),
            assets,
            liabilities,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assets(&self) -> &Ledger {
        &self.assets
    }

    pub fn liabilities(&self) -> &Ledger {
        &self.liabilities
    }

    pub fn show(&self) {
        print!("{}", self.summary());
    }

    pub fn summary(&self) -> String {
        format!("{} {}\n", Self::KIND, self.name)
    }

    pub fn pprint(&self, show_currency: bool) {
        print!("{}", self.render(show_currency));
    }

    pub fn render(&self, show_currency: bool) -> String {
        let mut out = format!("{}\n", self.name);
        out.push_str(&self.assets.render(show_currency));
        out.push_str(&self.liabilities.render(show_currency));
        out
    }

    /// Snapshot histories of every account, assets first.
    pub fn chart(&self, ticks: usize, y_max: f64) -> Chart {
        let mut chart = Chart::new(self.name.clone(), ticks, y_max);
        let accounts = self
            .assets
            .accounts()
            .iter()
            .chain(self.liabilities.accounts());
        for handle in accounts {
            let acc = handle.borrow();
            chart.series.push(Series {
                label: acc.name().to_string(),
                color: acc.color().to_string(),
                points: acc.snapshots().to_vec(),
            });
        }
        chart
    }

    pub fn plot<S: ChartSurface>(
        &self,
        ticks: usize,
        y_max: f64,
        surface: &mut S,
    ) -> Result<(), Error> {
        surface.render(&self.chart(ticks, y_max))
    }
}
