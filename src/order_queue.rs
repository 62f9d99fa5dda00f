//! A single price level: resting orders in arrival order.
//!
//! The sequence is a doubly-linked list threaded through a hash map keyed
//! by order id, so any order can be unlinked in O(1) without scanning the
//! level. The order id doubles as the stable position handle stored in the
//! book's locator index; appends never invalidate it.

use rustc_hash::FxHashMap;

use crate::math::math::{safe_add, safe_sub};
use crate::{Order, OrderId, Price, Quantity};

#[derive(Debug)]
struct Node {
    prev: Option<OrderId>,
    next: Option<OrderId>,
    order: Order,
}

#[derive(Debug)]
pub(crate) struct OrderQueue {
    pub price: Price,
    /// Sum of the remaining quantities of every resting order.
    pub volume: Quantity,
    head: Option<OrderId>,
    tail: Option<OrderId>,
    nodes: FxHashMap<OrderId, Node>,
}

impl OrderQueue {
    pub fn new(price: Price) -> OrderQueue {
        OrderQueue {
            price,
            volume: 0,
            head: None,
            tail: None,
            nodes: FxHashMap::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The resting order at the head of the level, if any.
    pub fn front(&self) -> Option<&Order> {
        self.head.and_then(|id| self.nodes.get(&id)).map(|n| &n.order)
    }

    /// Append an order at the tail of the queue.
    pub fn append(&mut self, order: Order) {
        let id = order.order_id;
        let node = Node { prev: self.tail, next: None, order };
        self.volume = safe_add(self.volume, node.order.quantity);

        if let Some(tail_id) = self.tail {
            let tail_node = self.nodes.get_mut(&tail_id).unwrap_or_else(|| {
                panic!("OrderQueue at price {} is broken: tail {} not in nodes", self.price, tail_id)
            });
            tail_node.next = Some(id);
        } else {
            // First element
            self.head = Some(id);
        }

        self.tail = Some(id);
        self.nodes.insert(id, node);
    }

    /// Unlink an order by id, returning it. O(1); no scan.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let node = self.nodes.remove(&id)?;

        self.volume = safe_sub(self.volume, node.order.quantity);

        match (node.prev, node.next) {
            (Some(prev), Some(next)) => {
                self.nodes.get_mut(&prev).unwrap().next = Some(next);
                self.nodes.get_mut(&next).unwrap().prev = Some(prev);
            }
            (Some(prev), None) => {
                self.nodes.get_mut(&prev).unwrap().next = None;
                self.tail = Some(prev);
            }
            (None, Some(next)) => {
                self.nodes.get_mut(&next).unwrap().prev = None;
                self.head = Some(next);
            }
            (None, None) => {
                self.head = None;
                self.tail = None;
            }
        }

        Some(node.order)
    }

    /// Remove and return the order at the head of the queue.
    pub fn pop_front(&mut self) -> Option<Order> {
        let id = self.head?;
        self.remove(id)
    }

    /// Reduce the head order's remaining quantity by `qty` after a
    /// partial fill. The caller guarantees `qty` is at most the head's
    /// remaining quantity.
    pub fn reduce_front(&mut self, qty: Quantity) {
        if let Some(id) = self.head {
            let node = self.nodes.get_mut(&id).unwrap();
            node.order.quantity -= qty;
            self.volume = safe_sub(self.volume, qty);
        }
    }

    /// Order ids in FIFO order. Test and diagnostics helper.
    pub fn iter_ids(&self) -> Vec<OrderId> {
        let mut ids = Vec::new();
        let mut current = self.head;
        while let Some(id) = current {
            ids.push(id);
            current = self.nodes.get(&id).and_then(|n| n.next);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;

    fn make_order(id: OrderId, qty: Quantity) -> Order {
        Order::limit(id, 1, Side::Buy, 100, qty)
    }

    #[test]
    fn test_new_queue_is_empty() {
        let q = OrderQueue::new(100);
        assert!(q.is_empty());
        assert_eq!(q.volume, 0);
        assert_eq!(q.len(), 0);
        assert!(q.front().is_none());
        assert_eq!(q.iter_ids().len(), 0);
    }

    #[test]
    fn test_append_one_order() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 50));

        assert!(!q.is_empty());
        assert_eq!(q.volume, 50);
        assert_eq!(q.front().unwrap().order_id, 1);
        assert_eq!(q.iter_ids(), vec![1]);
    }

    #[test]
    fn test_append_keeps_fifo_order() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 10));
        q.append(make_order(2, 20));
        q.append(make_order(3, 30));

        assert_eq!(q.volume, 60);
        assert_eq!(q.front().unwrap().order_id, 1);
        assert_eq!(q.iter_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_middle_order() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 10));
        q.append(make_order(2, 20));
        q.append(make_order(3, 30));

        let removed = q.remove(2).unwrap();
        assert_eq!(removed.order_id, 2);
        assert_eq!(removed.quantity, 20);

        assert_eq!(q.volume, 40); // 10 + 30
        assert_eq!(q.iter_ids(), vec![1, 3]);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 10));
        q.append(make_order(2, 20));
        q.append(make_order(3, 30));

        q.remove(1);
        assert_eq!(q.front().unwrap().order_id, 2);
        q.remove(3);
        assert_eq!(q.iter_ids(), vec![2]);
        assert_eq!(q.volume, 20);
    }

    #[test]
    fn test_remove_only_order() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 50));
        q.remove(1);

        assert!(q.is_empty());
        assert_eq!(q.volume, 0);
    }

    #[test]
    fn test_remove_unknown_order() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 50));

        assert!(q.remove(99).is_none());
        assert!(!q.is_empty());
        assert_eq!(q.volume, 50);
    }

    #[test]
    fn test_pop_front() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 10));
        q.append(make_order(2, 20));

        assert_eq!(q.pop_front().unwrap().order_id, 1);
        assert_eq!(q.pop_front().unwrap().order_id, 2);
        assert!(q.pop_front().is_none());
        assert_eq!(q.volume, 0);
    }

    #[test]
    fn test_reduce_front() {
        let mut q = OrderQueue::new(100);
        q.append(make_order(1, 10));
        q.append(make_order(2, 20));

        q.reduce_front(4);
        assert_eq!(q.front().unwrap().quantity, 6);
        assert_eq!(q.volume, 26);

        // second order untouched
        q.remove(1);
        assert_eq!(q.front().unwrap().quantity, 20);
        assert_eq!(q.volume, 20);
    }

    #[test]
    fn stress_test_append_and_remove() {
        let mut q = OrderQueue::new(100);
        let n: i64 = 1000;

        for i in 0..n {
            q.append(make_order(i as OrderId, i + 1));
        }

        let expected_volume = n * (n + 1) / 2;
        assert_eq!(q.volume, expected_volume);
        assert_eq!(q.len(), n as usize);

        for i in 0..n {
            q.remove(i as OrderId);
        }

        assert!(q.is_empty());
        assert_eq!(q.volume, 0);
    }

    #[test]
    fn random_append_remove_test() {
        use rand::seq::SliceRandom;

        let mut q = OrderQueue::new(50);
        let mut ids = Vec::new();
        let mut rng = rand::rng();

        for i in 0..500u64 {
            let qty = (rand::random::<u64>() % 1000 + 1) as Quantity;
            q.append(make_order(i, qty));
            ids.push((i, qty));
        }

        let expected_volume: Quantity = ids.iter().map(|(_, qty)| *qty).sum();
        assert_eq!(q.volume, expected_volume);

        ids.shuffle(&mut rng);
        for (id, _) in ids.iter() {
            q.remove(*id);
        }

        assert!(q.is_empty());
        assert_eq!(q.volume, 0);
    }
}
