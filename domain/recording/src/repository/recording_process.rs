use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{
    entity::RecordingProcess,
    vo::{FragmentSpec, Payload},
};

#[async_trait]
pub trait RecordingProcessRepo: Send + Sync {
    /// Fragments with `lower < status < upper`, in stable creation order.
    async fn get_active(&self, lower: i32, upper: i32) -> anyhow::Result<Vec<RecordingProcess>>;

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<RecordingProcess>;

    async fn update_status(
        &self,
        id: Uuid,
        status: i32,
        payload: Option<Payload>,
    ) -> anyhow::Result<()>;

    /// Insert one NEW row per detected fragment, all inside a single
    /// transaction: a failure part-way must leave no rows behind.
    async fn create_fragments(
        &self,
        recording_id: Uuid,
        specs: Vec<FragmentSpec>,
    ) -> anyhow::Result<()>;
}
