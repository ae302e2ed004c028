//! UseCase layer: one struct per operation of the relay hub.

pub mod connect_client;
pub mod disconnect_client;
pub mod get_channel_status;
pub mod list_donations;
pub mod receive_donation;
pub mod record_heartbeat;
pub mod reset_donations;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use get_channel_status::GetChannelStatusUseCase;
pub use list_donations::ListDonationsUseCase;
pub use receive_donation::ReceiveDonationUseCase;
pub use record_heartbeat::RecordHeartbeatUseCase;
pub use reset_donations::{ResetDonationsUseCase, ResetReport};
