use super::*;

/// Tests redeeming until the limit is reached.
///
/// Expected: two redemptions succeed, the third is refused and the count stays at 2
#[tokio::test]
async fn stops_at_max_redemptions() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let coupon = factory::coupon::CouponFactory::new(db)
        .max_redemptions(2)
        .build()
        .await?;

    let repo = CouponRepository::new(db);

    assert!(repo.try_redeem(coupon.id).await?);
    assert!(repo.try_redeem(coupon.id).await?);
    assert!(!repo.try_redeem(coupon.id).await?);

    let coupon = repo.find_by_id(coupon.id).await?.unwrap();
    assert_eq!(coupon.redemption_count, 2);
    assert!(coupon.is_exhausted());

    Ok(())
}

/// Tests that coupons without a limit can always be redeemed.
///
/// Expected: Ok(true) for every redemption
#[tokio::test]
async fn unlimited_coupon_always_redeems() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let coupon = factory::create_coupon(db).await?;

    let repo = CouponRepository::new(db);
    for _ in 0..5 {
        assert!(repo.try_redeem(coupon.id).await?);
    }

    assert_eq!(repo.find_by_id(coupon.id).await?.unwrap().redemption_count, 5);

    Ok(())
}
