use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{entity::Recording, vo::Payload};

#[async_trait]
pub trait RecordingRepo: Send + Sync {
    /// Recordings with `lower < status < upper`, in stable registration
    /// order.
    async fn get_active(&self, lower: i32, upper: i32) -> anyhow::Result<Vec<Recording>>;

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Recording>;

    /// Update one row's status, persisting the transition payload with it.
    async fn update_status(
        &self,
        id: Uuid,
        status: i32,
        payload: Option<Payload>,
    ) -> anyhow::Result<()>;
}
