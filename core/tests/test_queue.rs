#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;

    use rotxor_core::stream::queue::{CompletionQueue, QueueError, WorkQueue};
    use rotxor_core::stream::Block;

    fn block(index: u64) -> Block {
        Block::from_slice(index, &[index as u8])
    }

    // ------------------------------------------------------------
    // Block
    // ------------------------------------------------------------
    #[test]
    fn block_fill_full_and_short() {
        let mut reader = Cursor::new(vec![1u8, 2, 3, 4, 5, 6]);

        let mut first = Block::new(0, 4);
        assert_eq!(first.fill_from(&mut reader).unwrap(), 4);
        assert!(!first.is_short());
        assert_eq!(first.data(), &[1, 2, 3, 4]);

        let mut second = Block::new(1, 4);
        assert_eq!(second.fill_from(&mut reader).unwrap(), 2);
        assert!(second.is_short());
        assert_eq!(second.data(), &[5, 6]);
        assert_eq!(second.capacity(), 4);

        let mut third = Block::new(2, 4);
        assert_eq!(third.fill_from(&mut reader).unwrap(), 0);
        assert!(third.is_empty());
    }

    #[test]
    fn block_reindex_resets_length() {
        let mut b = Block::from_slice(3, &[7, 7]);
        b.reindex(9);
        assert_eq!(b.index(), 9);
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 2);
    }

    // ------------------------------------------------------------
    // WorkQueue
    // ------------------------------------------------------------
    #[test]
    fn work_queue_is_fifo() {
        let mut q = WorkQueue::new();
        for i in [4, 1, 7] {
            q.push(block(i));
        }
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop().map(|b| b.index()), Some(4));
        assert_eq!(q.pop().map(|b| b.index()), Some(1));
        assert_eq!(q.pop().map(|b| b.index()), Some(7));
        assert!(q.pop().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn work_queue_clear_reports_released() {
        let mut q = WorkQueue::new();
        q.push(block(0));
        q.push(block(1));
        assert_eq!(q.clear(), 2);
        assert!(q.is_empty());
    }

    // ------------------------------------------------------------
    // CompletionQueue
    // ------------------------------------------------------------
    #[test]
    fn completion_queue_orders_by_index() {
        let mut q = CompletionQueue::new();
        for i in [3, 0, 2, 1] {
            q.insert(block(i)).unwrap();
        }
        assert_eq!(q.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        let taken: Vec<u64> = q.take_all().iter().map(Block::index).collect();
        assert_eq!(taken, vec![0, 1, 2, 3]);
        assert!(q.is_empty());
    }

    #[test]
    fn completion_queue_rejects_duplicates() {
        let mut q = CompletionQueue::new();
        q.insert(block(5)).unwrap();
        assert_eq!(q.insert(block(5)), Err(QueueError::DuplicateIndex(5)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn completion_queue_keeps_payloads_with_indices() {
        let mut q = CompletionQueue::new();
        q.insert(Block::from_slice(1, b"world")).unwrap();
        q.insert(Block::from_slice(0, b"hello ")).unwrap();

        let joined: Vec<u8> = q.take_all().iter().flat_map(|b| b.data().to_vec()).collect();
        assert_eq!(joined, b"hello world".to_vec());
    }

    proptest! {
        #[test]
        fn any_insertion_order_drains_ascending(
            order in Just((0u64..40).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let mut q = CompletionQueue::new();
            for i in &order {
                q.insert(block(*i)).unwrap();
                let seen: Vec<u64> = q.indices().collect();
                prop_assert!(seen.windows(2).all(|w| w[0] < w[1]));
            }
            let drained: Vec<u64> = q.take_all().iter().map(Block::index).collect();
            prop_assert_eq!(drained, (0u64..40).collect::<Vec<_>>());
        }
    }
}
