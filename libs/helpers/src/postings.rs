use std::{cell::RefCell, rc::Rc};

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Geometric};

use postings_query::base::{DocId, Posting};

/// Random strictly increasing posting list
///
/// Gaps between document IDs follow a geometric distribution with
/// parameter `density`
pub fn random_postings(length: usize, density: f64, rng: &mut dyn RngCore) -> Vec<Posting> {
    let gaps = Geometric::new(density).unwrap();
    let mut docid: DocId = gaps.sample(rng);
    let mut postings = Vec::with_capacity(length);
    for _ in 0..length {
        postings.push(Posting::new(docid, rng.gen_range(1..5)));
        docid += 1 + gaps.sample(rng);
    }
    postings
}

pub fn postings(docids: &[DocId]) -> Vec<Posting> {
    docids.iter().map(|&docid| Posting::new(docid, 1)).collect()
}

pub fn docids(postings: impl IntoIterator<Item = Posting>) -> Vec<DocId> {
    postings.into_iter().map(|p| p.docid).collect()
}

/// What happened while consuming instrumented streams
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A stream (identified by its label) handed out a posting
    Pulled(char, DocId),
    /// The consumer received a posting from the merged stream
    Yielded(DocId),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// A posting stream that records every posting it hands out
pub struct InstrumentedStream {
    label: char,
    postings: std::vec::IntoIter<Posting>,
    log: EventLog,
}

impl InstrumentedStream {
    pub fn new(label: char, docids: &[DocId], log: &EventLog) -> Self {
        Self {
            label,
            postings: postings(docids).into_iter(),
            log: log.clone(),
        }
    }
}

impl Iterator for InstrumentedStream {
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        let posting = self.postings.next()?;
        self.log
            .borrow_mut()
            .push(Event::Pulled(self.label, posting.docid));
        Some(posting)
    }
}

/// Drains a merged stream, logging each output posting
pub fn drain_logged(merged: impl Iterator<Item = Posting>, log: &EventLog) -> Vec<DocId> {
    let mut output = Vec::new();
    for posting in merged {
        log.borrow_mut().push(Event::Yielded(posting.docid));
        output.push(posting.docid);
    }
    output
}

/// Largest look-ahead of a stream, i.e. the maximum number of postings
/// pulled from the stream with an ID greater than a document being yielded
pub fn max_lookahead(log: &[Event], label: char) -> usize {
    let mut pulled: Vec<DocId> = Vec::new();
    let mut max = 0;
    for event in log {
        match *event {
            Event::Pulled(l, docid) if l == label => pulled.push(docid),
            Event::Pulled(..) => {}
            Event::Yielded(docid) => {
                let ahead = pulled.iter().filter(|&&p| p > docid).count();
                max = max.max(ahead);
            }
        }
    }
    max
}
