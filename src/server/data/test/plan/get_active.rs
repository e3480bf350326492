use super::*;

/// Tests that only active plans are listed, cheapest first.
///
/// Expected: Ok with the two active plans ordered by price
#[tokio::test]
async fn lists_active_plans_by_price() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let expensive = factory::plan::PlanFactory::new(db)
        .price_cents(99900)
        .build()
        .await?;
    let cheap = factory::plan::PlanFactory::new(db)
        .price_cents(19900)
        .build()
        .await?;
    factory::plan::PlanFactory::new(db)
        .active(false)
        .build()
        .await?;

    let repo = PlanRepository::new(db);
    let plans = repo.get_active().await?;

    assert_eq!(
        plans.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![cheap.id, expensive.id]
    );
    assert_eq!(repo.get_all().await?.len(), 3);

    Ok(())
}

/// Tests creating a plan and finding it by slug.
///
/// Expected: Ok with the subscription plan active and currency upper-cased
#[tokio::test]
async fn creates_plan_findable_by_slug() -> Result<(), AppError> {
    let test = TestBuilder::new().with_credit_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PlanRepository::new(db);
    let plan = repo
        .create(CreatePlanParam {
            slug: "creator".to_string(),
            name: "Creator".to_string(),
            kind: PlanKind::Subscription,
            price_cents: 49900,
            currency: "inr".to_string(),
            credits: 60,
        })
        .await?;

    assert_eq!(plan.currency, "INR");
    assert!(plan.active);
    assert_eq!(repo.find_by_slug("creator").await?, Some(plan));

    Ok(())
}
