use super::*;

/// Tests that coupon codes are stored upper-case and found case-insensitively.
///
/// Expected: Ok with code "WELCOME10" found via "welcome10"
#[tokio::test]
async fn stores_code_upper_case() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CouponRepository::new(db);
    let coupon = repo
        .create(CreateCouponParam {
            code: "welcome10".to_string(),
            discount_kind: DiscountKind::Percent,
            discount_value: 10,
            max_redemptions: Some(100),
            expires_at: None,
            plan_id: None,
        })
        .await?;

    assert_eq!(coupon.code, "WELCOME10");
    assert_eq!(coupon.redemption_count, 0);
    assert!(coupon.active);

    let found = repo.find_by_code(" welcome10").await?;
    assert_eq!(found.map(|c| c.id), Some(coupon.id));

    Ok(())
}

/// Tests deactivating a coupon.
///
/// Expected: Ok(true) and the coupon inactive afterwards
#[tokio::test]
async fn deactivates_coupon() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let coupon = factory::create_coupon(db).await?;

    let repo = CouponRepository::new(db);

    assert!(repo.set_active(coupon.id, false).await?);
    assert!(!repo.find_by_id(coupon.id).await?.unwrap().active);
    assert!(!repo.set_active(9999, false).await?);

    Ok(())
}
