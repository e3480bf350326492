//! Coupon service for checkout discounts and coupon administration.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{coupon::CouponRepository, is_unique_violation, plan::PlanRepository},
    error::AppError,
    model::coupon::{Coupon, CouponQuote, CreateCouponParam, PaginatedCoupons},
    util::parse::normalize_code,
};

pub struct CouponService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CouponService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Prices a plan with a coupon applied.
    ///
    /// Coupon codes are matched case-insensitively.
    ///
    /// # Returns
    /// - `Ok(CouponQuote)` - Discount and payable amount for the plan
    /// - `Err(AppError::NotFound)` - Unknown coupon code or plan slug
    /// - `Err(AppError::BadRequest)` - Coupon is inactive, expired, exhausted or
    ///   restricted to another plan
    pub async fn validate(&self, code: &str, plan_slug: &str) -> Result<CouponQuote, AppError> {
        let plan = PlanRepository::new(self.db)
            .find_by_slug(plan_slug.trim())
            .await?
            .filter(|plan| plan.active)
            .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", plan_slug)))?;

        let coupon = CouponRepository::new(self.db)
            .find_by_code(code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Coupon {} not found", normalize_code(code)))
            })?;

        coupon.ensure_applicable(&plan, Utc::now())?;

        Ok(CouponQuote::new(coupon, plan))
    }

    /// Consumes one redemption of a coupon.
    ///
    /// # Returns
    /// - `Ok(())` - Redemption counted
    /// - `Err(AppError::BadRequest)` - Redemption limit reached
    pub async fn redeem(&self, coupon_id: i32) -> Result<(), AppError> {
        if !CouponRepository::new(self.db).try_redeem(coupon_id).await? {
            return Err(AppError::BadRequest(
                "Coupon has reached its redemption limit".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates a coupon.
    ///
    /// # Returns
    /// - `Ok(Coupon)` - The created coupon with its normalized code
    /// - `Err(AppError::BadRequest)` - Invalid code or discount value, or unknown plan
    /// - `Err(AppError::Conflict)` - Code already in use
    pub async fn create(&self, param: CreateCouponParam) -> Result<Coupon, AppError> {
        param.validate()?;

        if let Some(plan_id) = param.plan_id {
            if PlanRepository::new(self.db).find_by_id(plan_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("Plan {} does not exist", plan_id)));
            }
        }

        let code = normalize_code(&param.code);
        match CouponRepository::new(self.db).create(param).await {
            Ok(coupon) => {
                tracing::info!(code = %coupon.code, "Created coupon");
                Ok(coupon)
            }
            Err(AppError::DbErr(ref e)) if is_unique_violation(e) => Err(AppError::Conflict(
                format!("Coupon {} already exists", code),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn list(&self, page: u64, per_page: u64) -> Result<PaginatedCoupons, AppError> {
        let (coupons, total) = CouponRepository::new(self.db)
            .get_all_paginated(page, per_page)
            .await?;

        let total_pages = (total as f64 / per_page as f64).ceil() as u64;

        Ok(PaginatedCoupons {
            coupons,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    /// Stops a coupon from being applied to new checkouts.
    pub async fn deactivate(&self, id: i32) -> Result<(), AppError> {
        if !CouponRepository::new(self.db).set_active(id, false).await? {
            return Err(AppError::NotFound(format!("Coupon {} not found", id)));
        }
        Ok(())
    }
}
