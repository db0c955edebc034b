use crate::book::Book;
use crate::domain::{
    Error, Event, EventKind,
    traits::{DeadLetterQueue, EventStream},
};

use futures::StreamExt;
use tracing::{debug, info};

/// Highest tick an event may target, so the tick counter never overflows.
pub const MAX_TICK: u32 = u32::MAX - 1;

/// Drives a [`Book`] through simulated time.
///
/// Ticks are numbered from 1. Closing a tick snapshots every distinct
/// account exactly once, so after `n` closed ticks each account holds
/// `n + 1` snapshots.
#[derive(Debug)]
pub struct Simulation<I, D>
where
    I: EventStream,
    D: DeadLetterQueue,
{
    ingestion: I,
    book: Book,
    dlq: D,
    tick: u32,
}

impl<I, D> Simulation<I, D>
where
    I: EventStream,
    D: DeadLetterQueue,
{
    pub fn new(ingestion: I, book: Book, dlq: D) -> Self {
        Self {
            ingestion,
            book,
            dlq,
            tick: 1,
        }
    }

    /// The tick that events are currently applied to.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn dlq(&self) -> &D {
        &self.dlq
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut res = self.ingestion.stream();

        while let Some(ev) = res.next().await {
            match ev {
                Ok(ev) => match self.apply_event(ev) {
                    Ok(()) => {}
                    Err(e) => self.dlq.report(&e),
                },
                Err(e) => self.dlq.report(&e),
            }
        }

        Ok(())
    }

    fn apply_event(&mut self, ev: Event) -> Result<(), Error> {
        if ev.tick > MAX_TICK {
            return Err(Error::Simulation(format!(
                "tick {} is beyond the last tick {} ({})",
                ev.tick, MAX_TICK, ev
            )));
        }
        if ev.tick < self.tick {
            return Err(Error::Simulation(format!(
                "event for closed tick {} ({})",
                ev.tick, ev
            )));
        }
        while self.tick < ev.tick {
            self.close_tick();
        }

        let account = self.book.account(&ev.account)?;
        match ev.kind {
            EventKind::Deposit { amount } => account.deposit(amount),
            EventKind::Withdrawal { amount } => account.withdraw(amount),
        }
    }

    pub fn close_tick(&mut self) {
        self.book.snapshot_all();
        debug!(tick = self.tick, "tick closed");
        self.tick = self.tick.saturating_add(1);
    }

    /// Closes the open tick and any further ticks up to `ticks` (capped at
    /// [`MAX_TICK`]), returning the number of closed ticks.
    pub fn finish(&mut self, ticks: Option<u32>) -> u32 {
        self.close_tick();
        if let Some(ticks) = ticks.map(|t| t.min(MAX_TICK)) {
            while self.tick <= ticks {
                self.close_tick();
            }
        }
        let closed = self.tick - 1;
        info!(ticks = closed, "simulation finished");
        closed
    }

    pub fn into_book(self) -> Book {
        self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{CsvReader, read_agents};
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct CollectingDLQ {
        errors: RefCell<Vec<String>>,
    }

    impl DeadLetterQueue for CollectingDLQ {
        fn report(&self, error: &Error) {
            self.errors.borrow_mut().push(error.to_string());
        }
    }

    const AGENTS: &str = "agent,side,account,balance\n\
                          A,asset,Cash,900\n\
                          A,liability,Loan,500\n\
                          B,asset,Loan,500\n";

    fn simulation(events: &str) -> Simulation<CsvReader<Cursor<Vec<u8>>>, CollectingDLQ> {
        let book = Book::from_rows(read_agents(AGENTS.as_bytes()).unwrap());
        let reader = CsvReader::new(Cursor::new(events.as_bytes().to_vec()));
        Simulation::new(reader, book, CollectingDLQ::default())
    }

    #[tokio::test]
    async fn builds_snapshot_series_per_tick() {
        let mut sim = simulation(
            "tick,account,type,amount\n\
             1,Cash,withdrawal,100\n\
             2,Cash,withdrawal,100\n\
             3,Cash,deposit,300\n",
        );
        sim.process().await.unwrap();
        assert_eq!(sim.finish(None), 3);

        let book = sim.book();
        let cash = book.account("Cash").unwrap();
        assert_eq!(&*cash.snapshots(), &[900.0, 800.0, 700.0, 1000.0]);
        let loan = book.account("Loan").unwrap();
        assert_eq!(&*loan.snapshots(), &[500.0, 500.0, 500.0, 500.0]);
        assert!(sim.dlq().errors.borrow().is_empty());
    }

    #[tokio::test]
    async fn skipped_ticks_still_snapshot() {
        let mut sim = simulation(
            "tick,account,type,amount\n\
             3,Loan,deposit,50\n",
        );
        sim.process().await.unwrap();
        assert_eq!(sim.finish(Some(5)), 5);

        let loan = sim.book().account("Loan").unwrap().clone();
        assert_eq!(
            &*loan.snapshots(),
            &[500.0, 500.0, 500.0, 550.0, 550.0, 550.0]
        );
        assert_eq!(sim.book().sheets()[0].liabilities().total(), 550.0);
        assert_eq!(sim.book().sheets()[1].assets().total(), 550.0);
    }

    #[tokio::test]
    async fn ticks_past_the_last_one_are_dead_lettered() {
        let mut sim = simulation(&format!(
            "tick,account,type,amount\n\
             1,Cash,deposit,10\n\
             {},Cash,deposit,10\n",
            u32::MAX
        ));
        sim.process().await.unwrap();

        let errors = sim.dlq().errors.borrow();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("beyond the last tick"));
        assert_eq!(sim.tick(), 1);
        assert_eq!(sim.book().account("Cash").unwrap().balance(), 910.0);
    }

    #[test]
    fn finishing_at_the_tick_limit_does_not_overflow() {
        let mut sim = simulation("tick,account,type,amount\n");
        sim.tick = MAX_TICK;
        assert_eq!(sim.finish(Some(u32::MAX)), MAX_TICK);
        assert_eq!(sim.tick(), u32::MAX);

        // Closing again saturates instead of wrapping.
        sim.close_tick();
        assert_eq!(sim.tick(), u32::MAX);
        assert_eq!(sim.finish(Some(u32::MAX)), MAX_TICK);

        let cash = sim.book().account("Cash").unwrap();
        assert_eq!(cash.snapshots().len(), 4);
    }

    #[tokio::test]
    async fn bad_events_are_dead_lettered() {
        let mut sim = simulation(
            "tick,account,type,amount\n\
             2,Cash,deposit,10\n\
             1,Cash,deposit,10\n\
             2,Gold,deposit,10\n\
             2,Cash,deposit,NaN\n\
             2,Cash,borrow,10\n\
             2,Cash,deposit,5\n",
        );
        sim.process().await.unwrap();
        sim.finish(None);

        let errors = sim.dlq().errors.borrow();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("closed tick"));
        assert!(errors[1].contains("Unknown account: Gold"));
        assert!(errors[2].contains("Invalid amount"));
        assert!(errors[3].contains("Invalid event type"));

        assert_eq!(sim.book().account("Cash").unwrap().balance(), 915.0);
    }
}
