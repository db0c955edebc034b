/// A balance change scheduled for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    Deposit { amount: f64 },
    Withdrawal { amount: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub tick: u32,
    pub account: String,
    pub kind: EventKind,
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?},tick={},account={}", self.kind, self.tick, self.account)
    }
}
