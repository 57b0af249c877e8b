use super::*;
use quickcheck::{quickcheck, TestResult};
use std::cell::Cell;

fn letters(n: usize) -> Vec<char> {
    (b'a'..).take(n).map(char::from).collect()
}

#[test]
fn test_odd_length_leaves_short_tail() {
    let groups: Vec<_> = generate_batches(letters(5), 2).unwrap().collect();
    assert_eq!(groups, vec![vec!['a', 'b'], vec!['c', 'd'], vec!['e']]);
}

#[test]
fn test_even_length_splits_evenly() {
    let groups: Vec<_> = generate_batches(letters(4), 2).unwrap().collect();
    assert_eq!(groups, vec![vec!['a', 'b'], vec!['c', 'd']]);
}

#[test]
fn test_empty_input_yields_nothing() {
    let mut batches = generate_batches(Vec::<char>::new(), 25).unwrap();
    assert_eq!(batches.next(), None);
}

#[test]
fn test_single_item_under_limit() {
    let groups: Vec<_> = generate_batches(vec!['a'], 25).unwrap().collect();
    assert_eq!(groups, vec![vec!['a']]);
}

#[test]
fn test_exactly_one_full_campaign_batch() {
    let items: Vec<u32> = (0..25).collect();
    let groups: Vec<_> = generate_batches(items.clone(), DEFAULT_BATCH_LIMIT)
        .unwrap()
        .collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0], items);
}

#[test]
fn test_zero_limit_rejected_before_pulling() {
    let pulled = Cell::new(0);
    let items = (0..10).inspect(|_| pulled.set(pulled.get() + 1));

    let result = generate_batches(items, 0);
    assert_eq!(result.unwrap_err(), BatchError::InvalidLimit(0));
    assert_eq!(pulled.get(), 0);
}

#[test]
fn test_negative_limit_rejected() {
    assert_eq!(
        BatchLimit::try_from(-3_i64).unwrap_err(),
        BatchError::InvalidLimit(-3)
    );
    assert_eq!(
        BatchLimit::try_from(0_i64).unwrap_err(),
        BatchError::InvalidLimit(0)
    );
    assert_eq!(BatchLimit::try_from(7_i64).unwrap().get(), 7);
}

#[test]
fn test_invalid_limit_message() {
    let err = Batcher::with_limit(0).unwrap_err();
    assert!(err.to_string().contains("must be a positive integer"));
}

#[test]
fn test_default_limit_is_campaign_update_limit() {
    assert_eq!(BatchLimit::default().get(), 25);
    assert_eq!(Batcher::default().limit.get(), 25);
}

#[test]
fn test_pulls_lazily() {
    let pulled = Cell::new(0);
    let items = (0..10).inspect(|_| pulled.set(pulled.get() + 1));

    let mut batches = generate_batches(items, 3).unwrap();
    assert_eq!(pulled.get(), 0);

    assert_eq!(batches.next(), Some(vec![0, 1, 2]));
    assert_eq!(pulled.get(), 3);

    assert_eq!(batches.next(), Some(vec![3, 4, 5]));
    assert_eq!(pulled.get(), 6);
}

#[test]
fn test_early_stop_leaves_rest_of_borrowed_input() {
    let mut source = 0..7;
    {
        let mut batches = generate_batches(&mut source, 2).unwrap();
        assert_eq!(batches.next(), Some(vec![0, 1]));
    }
    assert_eq!(source.collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
}

#[test]
fn test_batches_are_fused() {
    let mut batches = generate_batches(vec![1, 2, 3], 2).unwrap();
    assert_eq!(batches.next(), Some(vec![1, 2]));
    assert_eq!(batches.next(), Some(vec![3]));
    assert_eq!(batches.next(), None);
    assert_eq!(batches.next(), None);
}

#[test]
fn test_size_hint_counts_groups() {
    let batches = generate_batches(0..10, 4).unwrap();
    assert_eq!(batches.size_hint(), (3, Some(3)));
}

#[test]
fn test_batcher_is_reusable_across_inputs() {
    let batcher = Batcher::with_limit(3).unwrap();
    let names = ["spring", "summer", "fall", "winter"];

    let first: Vec<Vec<&&str>> = batcher.batches(names.iter()).collect();
    let second: Vec<Vec<u8>> = batcher.batches(0..3u8).collect();

    assert_eq!(first, vec![vec![&"spring", &"summer", &"fall"], vec![&"winter"]]);
    assert_eq!(second, vec![vec![0, 1, 2]]);
}

#[test]
fn test_try_batches_happy_path() {
    let items: Vec<Result<u32, String>> = (0..5).map(Ok).collect();
    let groups: Vec<_> = try_generate_batches(items, 2).unwrap().collect();
    assert_eq!(
        groups,
        vec![Ok(vec![0, 1]), Ok(vec![2, 3]), Ok(vec![4])]
    );
}

#[test]
fn test_try_batches_propagates_error_and_drops_partial_group() {
    let items: Vec<Result<u32, &str>> = vec![Ok(1), Ok(2), Ok(3), Err("page 2 failed"), Ok(5)];
    let mut batches = try_generate_batches(items, 2).unwrap();

    assert_eq!(batches.next(), Some(Ok(vec![1, 2])));
    // item 3 was gathered but never completes a group
    assert_eq!(batches.next(), Some(Err("page 2 failed")));
    assert_eq!(batches.next(), None);
}

#[test]
fn test_try_batches_error_first() {
    let items: Vec<Result<u32, &str>> = vec![Err("auth"), Ok(1)];
    let groups: Vec<_> = try_generate_batches(items, 10).unwrap().collect();
    assert_eq!(groups, vec![Err("auth")]);
}

#[test]
fn test_try_batches_zero_limit() {
    let items: Vec<Result<u32, String>> = vec![Ok(1)];
    assert!(try_generate_batches(items, 0).is_err());
}

quickcheck! {
    fn concatenation_reconstructs_input(input: Vec<u16>, limit: u8) -> TestResult {
        if limit == 0 {
            return TestResult::discard();
        }

        let flattened: Vec<u16> = generate_batches(input.clone(), limit as usize)
            .unwrap()
            .flatten()
            .collect();

        TestResult::from_bool(flattened == input)
    }

    fn only_last_group_may_be_short(input: Vec<u16>, limit: u8) -> TestResult {
        if limit == 0 {
            return TestResult::discard();
        }
        let limit = limit as usize;

        let groups: Vec<Vec<u16>> = generate_batches(input.clone(), limit).unwrap().collect();
        if input.is_empty() {
            return TestResult::from_bool(groups.is_empty());
        }

        let (last, full) = match groups.split_last() {
            Some(split) => split,
            None => return TestResult::failed(),
        };
        let full_ok = full.iter().all(|group| group.len() == limit);
        let last_ok = !last.is_empty() && last.len() <= limit;

        TestResult::from_bool(full_ok && last_ok && groups.len() == input.len().div_ceil(limit))
    }

    fn repeated_runs_agree(input: Vec<u16>, limit: u8) -> TestResult {
        if limit == 0 {
            return TestResult::discard();
        }

        let first: Vec<_> = generate_batches(input.clone(), limit as usize).unwrap().collect();
        let second: Vec<_> = generate_batches(input, limit as usize).unwrap().collect();

        TestResult::from_bool(first == second)
    }

    fn try_batches_match_plain_batches_without_errors(input: Vec<u16>, limit: u8) -> TestResult {
        if limit == 0 {
            return TestResult::discard();
        }

        let plain: Vec<Vec<u16>> = generate_batches(input.clone(), limit as usize)
            .unwrap()
            .collect();
        let fallible: Result<Vec<Vec<u16>>, ()> =
            try_generate_batches(input.into_iter().map(Ok::<u16, ()>), limit as usize)
                .unwrap()
                .collect();

        TestResult::from_bool(fallible == Ok(plain))
    }

    fn error_ends_batching_after_full_groups(input: Vec<u16>, error_at: usize, limit: u8) -> TestResult {
        if limit == 0 {
            return TestResult::discard();
        }
        let limit = limit as usize;
        let error_at = error_at % (input.len() + 1);

        let mut items: Vec<Result<u16, &str>> = input.iter().copied().map(Ok).collect();
        items.insert(error_at, Err("page fetch failed"));

        let groups: Vec<Result<Vec<u16>, &str>> =
            try_generate_batches(items, limit).unwrap().collect();

        // every group gathered before the error is full and in order
        let full_groups = error_at / limit;
        let expected_before: Vec<Result<Vec<u16>, &str>> = input[..full_groups * limit]
            .chunks(limit)
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();

        let (last, before) = match groups.split_last() {
            Some(split) => split,
            None => return TestResult::failed(),
        };

        TestResult::from_bool(before == expected_before.as_slice() && *last == Err("page fetch failed"))
    }
}
