use crate::server::{
    data::scheduled_post::ScheduledPostRepository,
    error::AppError,
    model::scheduled_post::PostStatus,
};
use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory};

mod get_due;
