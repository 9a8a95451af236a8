//! `SeaORM` Entity for leave_requests table.

use payledger_core::payroll::{LeaveSpan, is_loss_of_pay_leave};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LeaveStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub staff_id: Uuid,
    pub leave_type: String,
    pub status: LeaveStatus,
    pub start_date: Date,
    pub end_date: Date,
}

impl From<Model> for LeaveSpan {
    fn from(model: Model) -> Self {
        Self {
            start_date: model.start_date,
            end_date: model.end_date,
            loss_of_pay: is_loss_of_pay_leave(&model.leave_type),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id",
        on_delete = "Cascade"
    )]
    Staff,
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
