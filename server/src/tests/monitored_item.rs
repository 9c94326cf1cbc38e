use telemon_types::service_types::MonitoredItemNotification;
use telemon_types::{DataValue, Variant};

use crate::subscriptions::monitored_item::MonitoredItem;

fn enqueue(item: &mut MonitoredItem, client_handle: u32, value: i32) {
    item.enqueue_notification(MonitoredItemNotification {
        client_handle,
        value: DataValue::new(value),
    });
}

#[test]
fn queue_preserves_fifo_order() {
    let mut item = MonitoredItem::new(1, 10);
    assert_eq!(item.monitored_item_id(), 1);
    enqueue(&mut item, 1, 10);
    enqueue(&mut item, 2, 20);
    enqueue(&mut item, 3, 30);
    assert_eq!(item.notification_count(), 3);

    let first = item.dequeue_notification().unwrap();
    assert_eq!(first.client_handle, 1);
    assert_eq!(first.value.value, Variant::Int32(10));
    assert_eq!(item.dequeue_notification().unwrap().client_handle, 2);
    assert_eq!(item.dequeue_notification().unwrap().client_handle, 3);
    assert!(item.dequeue_notification().is_none());
}

#[test]
fn overflow_discards_oldest() {
    let mut item = MonitoredItem::new(1, 2);
    enqueue(&mut item, 1, 10);
    enqueue(&mut item, 2, 20);
    enqueue(&mut item, 3, 30);
    assert_eq!(item.notification_count(), 2);
    assert_eq!(item.dequeue_notification().unwrap().client_handle, 2);
    assert_eq!(item.dequeue_notification().unwrap().client_handle, 3);
}

#[test]
fn queue_size_minimum_is_one() {
    let mut item = MonitoredItem::new(1, 0);
    assert_eq!(item.queue_size(), 1);
    enqueue(&mut item, 1, 10);
    enqueue(&mut item, 2, 20);
    assert_eq!(item.notification_count(), 1);
    assert_eq!(item.dequeue_notification().unwrap().client_handle, 2);
}
