//! Shared application state.

use std::sync::Arc;

use donation_relay_shared::time::Clock;

use crate::{
    domain::{ConnectionRegistry, DonationRepository, MessagePusher},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetChannelStatusUseCase,
        ListDonationsUseCase, ReceiveDonationUseCase, RecordHeartbeatUseCase,
        ResetDonationsUseCase,
    },
};

/// Shared application state
///
/// The one context object handed to every connection task and background task.
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub record_heartbeat_usecase: Arc<RecordHeartbeatUseCase>,
    pub receive_donation_usecase: Arc<ReceiveDonationUseCase>,
    pub reset_donations_usecase: Arc<ResetDonationsUseCase>,
    pub get_channel_status_usecase: Arc<GetChannelStatusUseCase>,
    pub list_donations_usecase: Arc<ListDonationsUseCase>,
}

impl AppState {
    /// Wire every use case onto the given stores
    pub fn new(
        repository: Arc<dyn DonationRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            record_heartbeat_usecase: Arc::new(RecordHeartbeatUseCase::new(
                registry.clone(),
                clock.clone(),
            )),
            receive_donation_usecase: Arc::new(ReceiveDonationUseCase::new(
                repository.clone(),
                clock,
            )),
            reset_donations_usecase: Arc::new(ResetDonationsUseCase::new(
                repository.clone(),
                registry.clone(),
                message_pusher,
            )),
            get_channel_status_usecase: Arc::new(GetChannelStatusUseCase::new(registry)),
            list_donations_usecase: Arc::new(ListDonationsUseCase::new(repository)),
        }
    }
}
