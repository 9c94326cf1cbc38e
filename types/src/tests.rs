use crate::service_types::{MonitoredItemNotification, NotificationMessage};
use crate::{DataValue, DateTime, StatusCode, Variant};

#[test]
fn status_code_severity() {
    assert!(StatusCode::Good.is_good());
    assert!(!StatusCode::Good.is_bad());
    assert!(StatusCode::BadSequenceNumberUnknown.is_bad());
    assert!(!StatusCode::BadSequenceNumberUnknown.is_good());
    assert_eq!(StatusCode::BadNoSubscription.name(), "BadNoSubscription");
}

#[test]
fn date_time_null() {
    assert!(DateTime::null().is_null());
    assert!(!DateTime::now().is_null());
    assert_eq!(DateTime::default(), DateTime::null());
}

#[test]
fn variant_conversions() {
    assert_eq!(Variant::from(true), Variant::Boolean(true));
    assert_eq!(Variant::from(-5i32), Variant::Int32(-5));
    assert_eq!(Variant::from(2.5f64), Variant::Double(2.5));
    assert_eq!(Variant::from("abc"), Variant::String("abc".to_string()));
}

#[test]
fn notification_message_data_change() {
    let notifications = vec![
        MonitoredItemNotification {
            client_handle: 1,
            value: DataValue::new(10),
        },
        MonitoredItemNotification {
            client_handle: 2,
            value: DataValue::new(20),
        },
    ];
    let message = NotificationMessage::data_change(5, DateTime::now(), notifications);
    assert_eq!(message.sequence_number, 5);
    assert_eq!(message.notification_data.len(), 1);
    assert_eq!(message.notification_count(), 2);
}

#[test]
fn notification_message_keep_alive() {
    let message = NotificationMessage::keep_alive(3, DateTime::now());
    assert_eq!(message.sequence_number, 3);
    assert!(message.notification_data.is_empty());
    assert_eq!(message.notification_count(), 0);
}
