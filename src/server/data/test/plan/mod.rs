use crate::server::{
    data::plan::PlanRepository,
    error::AppError,
    model::plan::{CreatePlanParam, PlanKind},
};
use test_utils::{builder::TestBuilder, factory};

mod get_active;
