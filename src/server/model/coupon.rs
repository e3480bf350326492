//! Discount coupons applied at checkout.

use chrono::{DateTime, Utc};

use crate::{
    model::coupon::{CouponDto, CouponQuoteDto, CreateCouponDto, PaginatedCouponsDto},
    server::{error::AppError, model::plan::Plan, util::parse::parse_stored},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// `discount_value` is a percentage between 1 and 100.
    Percent,
    /// `discount_value` is an amount in the smallest currency unit.
    Fixed,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fixed => "fixed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percent" => Some(Self::Percent),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub plan_id: Option<i32>,
    pub active: bool,
}

impl Coupon {
    /// Discount in cents for a plan priced at `price_cents`, never above the price.
    pub fn discount_for(&self, price_cents: i64) -> i64 {
        let price = price_cents.max(0);
        let discount = match self.discount_kind {
            DiscountKind::Percent => price * self.discount_value.clamp(0, 100) / 100,
            DiscountKind::Fixed => self.discount_value.max(0),
        };
        discount.min(price)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_redemptions
            .is_some_and(|max| self.redemption_count >= max)
    }

    /// Checks that the coupon can be applied to `plan` at `now`.
    ///
    /// # Returns
    /// - `Ok(())` - Coupon is usable
    /// - `Err(AppError::BadRequest)` - Coupon is inactive, expired, exhausted, or
    ///   restricted to a different plan
    pub fn ensure_applicable(&self, plan: &Plan, now: DateTime<Utc>) -> Result<(), AppError> {
        if !self.active {
            return Err(AppError::BadRequest(format!("Coupon {} is no longer active", self.code)));
        }
        if self.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(AppError::BadRequest(format!("Coupon {} has expired", self.code)));
        }
        if self.is_exhausted() {
            return Err(AppError::BadRequest(format!(
                "Coupon {} has reached its redemption limit",
                self.code
            )));
        }
        if self.plan_id.is_some_and(|plan_id| plan_id != plan.id) {
            return Err(AppError::BadRequest(format!(
                "Coupon {} cannot be used for plan {}",
                self.code, plan.slug
            )));
        }
        Ok(())
    }

    pub fn into_dto(self) -> CouponDto {
        CouponDto {
            id: self.id,
            code: self.code,
            discount_kind: self.discount_kind.as_str().to_string(),
            discount_value: self.discount_value,
            max_redemptions: self.max_redemptions,
            redemption_count: self.redemption_count,
            expires_at: self.expires_at,
            plan_id: self.plan_id,
            active: self.active,
        }
    }

    pub fn from_entity(entity: entity::coupon::Model) -> Result<Self, AppError> {
        let discount_kind =
            parse_stored("coupon.discount_kind", &entity.discount_kind, DiscountKind::parse)?;

        Ok(Self {
            id: entity.id,
            code: entity.code,
            discount_kind,
            discount_value: entity.discount_value,
            max_redemptions: entity.max_redemptions,
            redemption_count: entity.redemption_count,
            expires_at: entity.expires_at,
            plan_id: entity.plan_id,
            active: entity.active,
        })
    }
}

/// Price of a plan after a coupon.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponQuote {
    pub coupon: Coupon,
    pub plan: Plan,
    pub discount_cents: i64,
}

impl CouponQuote {
    pub fn new(coupon: Coupon, plan: Plan) -> Self {
        let discount_cents = coupon.discount_for(plan.price_cents);
        Self {
            coupon,
            plan,
            discount_cents,
        }
    }

    pub fn payable_cents(&self) -> i64 {
        (self.plan.price_cents - self.discount_cents).max(0)
    }

    pub fn into_dto(self) -> CouponQuoteDto {
        let payable_cents = self.payable_cents();
        CouponQuoteDto {
            code: self.coupon.code,
            plan_slug: self.plan.slug,
            price_cents: self.plan.price_cents,
            discount_cents: self.discount_cents,
            payable_cents,
            currency: self.plan.currency,
        }
    }
}

/// Parameters for creating a coupon from the admin API.
#[derive(Debug, Clone)]
pub struct CreateCouponParam {
    pub code: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i64,
    pub max_redemptions: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub plan_id: Option<i32>,
}

impl CreateCouponParam {
    /// Converts the admin request, rejecting an unknown discount kind.
    pub fn from_dto(dto: CreateCouponDto) -> Result<Self, AppError> {
        let discount_kind = DiscountKind::parse(&dto.discount_kind).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown discount kind '{}', expected percent or fixed",
                dto.discount_kind
            ))
        })?;

        Ok(Self {
            code: dto.code,
            discount_kind,
            discount_value: dto.discount_value,
            max_redemptions: dto.max_redemptions,
            expires_at: dto.expires_at,
            plan_id: dto.plan_id,
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let code = self.code.trim();
        let valid_chars = code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if code.is_empty() || code.len() > 32 || !valid_chars {
            return Err(AppError::BadRequest(
                "Coupon code must be 1-32 letters, digits, '-' or '_'".to_string(),
            ));
        }
        match self.discount_kind {
            DiscountKind::Percent if !(1..=100).contains(&self.discount_value) => {
                return Err(AppError::BadRequest(
                    "Percent discount must be between 1 and 100".to_string(),
                ));
            }
            DiscountKind::Fixed if self.discount_value <= 0 => {
                return Err(AppError::BadRequest(
                    "Fixed discount must be greater than zero".to_string(),
                ));
            }
            _ => {}
        }
        if self.max_redemptions.is_some_and(|max| max <= 0) {
            return Err(AppError::BadRequest(
                "Maximum redemptions must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedCoupons {
    pub coupons: Vec<Coupon>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl PaginatedCoupons {
    pub fn into_dto(self) -> PaginatedCouponsDto {
        PaginatedCouponsDto {
            coupons: self.coupons.into_iter().map(|c| c.into_dto()).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
