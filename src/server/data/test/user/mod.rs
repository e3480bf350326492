use crate::server::{
    data::user::UserRepository,
    model::{credit::CreditBalance, user::CreateUserParam},
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_all_paginated;
mod set_admin;
