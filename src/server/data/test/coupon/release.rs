use super::*;

/// Tests giving back a redemption.
///
/// Expected: count drops by one, a release at zero is refused
#[tokio::test]
async fn releases_down_to_zero() -> Result<(), AppError> {
    let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let coupon = factory::coupon::CouponFactory::new(db)
        .max_redemptions(1)
        .redemption_count(1)
        .build()
        .await?;

    let repo = CouponRepository::new(db);

    assert!(repo.release(coupon.id).await?);
    assert!(!repo.release(coupon.id).await?);
    assert_eq!(repo.find_by_id(coupon.id).await?.unwrap().redemption_count, 0);

    assert!(repo.try_redeem(coupon.id).await?);

    Ok(())
}
