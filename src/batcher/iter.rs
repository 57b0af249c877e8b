// iter.rs - groups a stream of items into bounded batches for remote execution

use super::{BatchError, BatchLimit};
use std::iter::FusedIterator;

/// Reusable batching policy with a fixed limit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Batcher {
    pub limit: BatchLimit,
}

impl Batcher {
    pub fn new(limit: BatchLimit) -> Self {
        Self { limit }
    }

    /// Build a batcher from a raw limit, rejecting zero
    pub fn with_limit(limit: usize) -> Result<Self, BatchError> {
        Ok(Self::new(BatchLimit::new(limit)?))
    }

    /// Lazily group `items` into `Vec`s of at most `limit` elements
    pub fn batches<I>(&self, items: I) -> Batches<I::IntoIter>
    where
        I: IntoIterator,
    {
        Batches {
            items: items.into_iter(),
            limit: self.limit.get(),
            done: false,
        }
    }

    /// Like [`Batcher::batches`], but stops at the first `Err` pulled from `items`
    pub fn try_batches<I, T, E>(&self, items: I) -> TryBatches<I::IntoIter>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        TryBatches {
            items: items.into_iter(),
            limit: self.limit.get(),
            done: false,
        }
    }
}

/// Partition `items` into consecutive groups of `limit` items, the last one possibly shorter.
///
/// The limit is validated before anything is pulled from `items`. The
/// returned iterator is lazy: each call to `next` pulls at most `limit`
/// items from the input.
///
/// ```
/// use adbatch::generate_batches;
///
/// let groups: Vec<Vec<char>> = generate_batches("abcde".chars(), 2).unwrap().collect();
/// assert_eq!(groups, vec![vec!['a', 'b'], vec!['c', 'd'], vec!['e']]);
/// ```
pub fn generate_batches<I>(items: I, limit: usize) -> Result<Batches<I::IntoIter>, BatchError>
where
    I: IntoIterator,
{
    Ok(Batcher::with_limit(limit)?.batches(items))
}

/// Fallible counterpart of [`generate_batches`] for inputs that can fail mid-stream,
/// such as a paginated remote query.
///
/// An input error is yielded as-is and ends the iteration; items already
/// gathered into the unfinished group are dropped.
pub fn try_generate_batches<I, T, E>(
    items: I,
    limit: usize,
) -> Result<TryBatches<I::IntoIter>, BatchError>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    Ok(Batcher::with_limit(limit)?.try_batches(items))
}

fn initial_capacity(limit: usize, hint: (usize, Option<usize>)) -> usize {
    limit.min(hint.0.max(1))
}

fn batch_count_hint(limit: usize, hint: (usize, Option<usize>)) -> (usize, Option<usize>) {
    (
        hint.0.div_ceil(limit),
        hint.1.map(|upper| upper.div_ceil(limit)),
    )
}

/// Iterator returned by [`generate_batches`] and [`Batcher::batches`]
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Batches<I> {
    items: I,
    limit: usize,
    done: bool,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut batch = Vec::with_capacity(initial_capacity(self.limit, self.items.size_hint()));
        for item in self.items.by_ref() {
            batch.push(item);
            if batch.len() == self.limit {
                return Some(batch);
            }
        }

        // Input exhausted; flush the remainder once
        self.done = true;
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            batch_count_hint(self.limit, self.items.size_hint())
        }
    }
}

impl<I: Iterator> FusedIterator for Batches<I> {}

/// Iterator returned by [`try_generate_batches`] and [`Batcher::try_batches`]
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TryBatches<I> {
    items: I,
    limit: usize,
    done: bool,
}

impl<I, T, E> Iterator for TryBatches<I>
where
    I: Iterator<Item = Result<T, E>>,
{
    type Item = Result<Vec<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut batch = Vec::with_capacity(initial_capacity(self.limit, self.items.size_hint()));
        loop {
            match self.items.next() {
                Some(Ok(item)) => {
                    batch.push(item);
                    if batch.len() == self.limit {
                        return Some(Ok(batch));
                    }
                }
                Some(Err(err)) => {
                    // An incomplete group is never handed out
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    return if batch.is_empty() {
                        None
                    } else {
                        Some(Ok(batch))
                    };
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // A single error can end things early, so only the upper bound holds
        let (_, upper) = batch_count_hint(self.limit, self.items.size_hint());
        (0, upper)
    }
}

impl<I, T, E> FusedIterator for TryBatches<I> where I: Iterator<Item = Result<T, E>> {}
