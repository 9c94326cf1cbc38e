//! Abstract bodies of the services the publish engine consumes and emits.

use crate::data_value::DataValue;
use crate::date_time::DateTime;
use crate::diagnostic_info::DiagnosticInfo;
use crate::status_code::StatusCode;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestHeader {
    pub timestamp: DateTime,
    /// Client-assigned handle echoed back in the matching response header.
    pub request_handle: u32,
}

impl RequestHeader {
    pub fn new(request_handle: u32) -> RequestHeader {
        RequestHeader {
            timestamp: DateTime::now(),
            request_handle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseHeader {
    pub timestamp: DateTime,
    pub request_handle: u32,
    pub service_result: StatusCode,
}

impl ResponseHeader {
    pub fn new_good(request_header: &RequestHeader) -> ResponseHeader {
        ResponseHeader::new_service_result(request_header, StatusCode::Good)
    }

    pub fn new_service_result(
        request_header: &RequestHeader,
        service_result: StatusCode,
    ) -> ResponseHeader {
        ResponseHeader {
            timestamp: DateTime::now(),
            request_handle: request_header.request_handle,
            service_result,
        }
    }
}

/// A client acknowledging receipt of one notification message, releasing it
/// from the server's retransmission queue.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SubscriptionAcknowledgement {
    pub subscription_id: u32,
    pub sequence_number: u32,
}

/// Clients queue publish requests ahead of time so the server has an envelope
/// ready whenever a notification message falls due.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishRequest {
    pub request_header: RequestHeader,
    pub subscription_acknowledgements: Vec<SubscriptionAcknowledgement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishResponse {
    pub response_header: ResponseHeader,
    pub subscription_id: u32,
    /// Sequence numbers still held for retransmission, newest first.
    pub available_sequence_numbers: Vec<u32>,
    pub more_notifications: bool,
    pub notification_message: NotificationMessage,
    /// Results for the acknowledgements that rode in on the request.
    pub results: Vec<StatusCode>,
    pub diagnostic_infos: Vec<DiagnosticInfo>,
}

/// One monitored value change, tagged with the handle the client chose for
/// the item when it was created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoredItemNotification {
    pub client_handle: u32,
    pub value: DataValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataChangeNotification {
    pub monitored_items: Vec<MonitoredItemNotification>,
}

/// The notification payloads a message can carry. Data changes are the only
/// kind the server emits today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NotificationData {
    DataChange(DataChangeNotification),
}

/// A single batched delivery to one subscription's client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationMessage {
    pub sequence_number: u32,
    pub publish_time: DateTime,
    /// Zero entries for a keep alive, one data change otherwise.
    pub notification_data: Vec<NotificationData>,
}

impl NotificationMessage {
    /// A message carrying the supplied data change notifications.
    pub fn data_change(
        sequence_number: u32,
        publish_time: DateTime,
        monitored_items: Vec<MonitoredItemNotification>,
    ) -> NotificationMessage {
        let data_change = DataChangeNotification { monitored_items };
        NotificationMessage {
            sequence_number,
            publish_time,
            notification_data: vec![NotificationData::DataChange(data_change)],
        }
    }

    /// An empty keep alive message proving the subscription is alive.
    pub fn keep_alive(sequence_number: u32, publish_time: DateTime) -> NotificationMessage {
        NotificationMessage {
            sequence_number,
            publish_time,
            notification_data: Vec::new(),
        }
    }

    /// The placeholder a response shell holds until the publish path fills in
    /// a real message.
    pub fn null() -> NotificationMessage {
        NotificationMessage {
            sequence_number: 0,
            publish_time: DateTime::null(),
            notification_data: Vec::new(),
        }
    }

    /// Number of individual notifications across the carried payloads.
    pub fn notification_count(&self) -> usize {
        self.notification_data
            .iter()
            .map(|n| match n {
                NotificationData::DataChange(d) => d.monitored_items.len(),
            })
            .sum()
    }
}
