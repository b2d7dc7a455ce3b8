use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One curated telemetry reading. Written by the upstream ingestion
/// pipeline; this service only reads it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "telemetry_curated")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sensor_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ts: DateTimeWithTimeZone,
    pub site: String,
    pub room: String,
    pub temp_c: f64,
    pub humidity: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
