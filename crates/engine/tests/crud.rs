mod common;

use chrono::Duration;
use common::{day, fund, test_engine};
use engine::{
    ActivityKind, CategoryNew, CostNew, CostUpdate, DateRange, EngineError, FundNew,
    FundTransferNew, FundTransferUpdate, ManualDistributionNew, NomenclatureNew, ReceiptNew,
    SponsorNew, SponsorUpdate,
};

#[tokio::test]
async fn sponsor_names_are_unique_ignoring_case() {
    let engine = test_engine().await;
    engine
        .create_sponsor(SponsorNew::new("  Acme   Corp ").contact("acme@example.org"))
        .await
        .unwrap();

    let err = engine
        .create_sponsor(SponsorNew::new("acme corp"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("acme corp".to_string()));

    let sponsors = engine.list_sponsors().await.unwrap();
    assert_eq!(sponsors.len(), 1);
    assert_eq!(sponsors[0].name, "Acme Corp");
}

#[tokio::test]
async fn sponsor_update_clears_text_with_empty_string() {
    let engine = test_engine().await;
    let sponsor = engine
        .create_sponsor(SponsorNew::new("Acme").note("first donor"))
        .await
        .unwrap();

    let updated = engine
        .update_sponsor(
            sponsor.id,
            SponsorUpdate {
                name: Some("Acme Ltd".to_string()),
                note: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Acme Ltd");
    assert_eq!(updated.note, None);
}

#[tokio::test]
async fn referenced_sponsor_cannot_be_deleted() {
    let engine = test_engine().await;
    let sponsor = engine.create_sponsor(SponsorNew::new("Acme")).await.unwrap();
    let detail = engine
        .create_receipt(ReceiptNew::new(1000, day(1, 10)).sponsor_id(sponsor.id))
        .await
        .unwrap();

    assert_eq!(
        engine.delete_sponsor(sponsor.id).await,
        Err(EngineError::InUse("Acme".to_string()))
    );

    engine.delete_receipt(detail.receipt.id).await.unwrap();
    engine.delete_sponsor(sponsor.id).await.unwrap();
    assert!(matches!(
        engine.sponsor(sponsor.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn receipt_validation() {
    let engine = test_engine().await;

    assert!(matches!(
        engine.create_receipt(ReceiptNew::new(0, day(1, 1))).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .create_receipt(ReceiptNew::new(100, day(1, 1)).sponsor_id(uuid::Uuid::new_v4()))
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn receipts_are_listed_newest_first_within_range() {
    let engine = test_engine().await;
    for (amount, date) in [(100, day(1, 5)), (200, day(2, 5)), (300, day(3, 5))] {
        engine
            .create_receipt(ReceiptNew::new(amount, date))
            .await
            .unwrap();
    }

    let receipts = engine
        .list_receipts(DateRange::new(Some(day(1, 6)), None), None)
        .await
        .unwrap();
    let amounts: Vec<_> = receipts.iter().map(|r| r.amount_minor).collect();
    assert_eq!(amounts, [300, 200]);

    assert!(matches!(
        engine
            .list_receipts(DateRange::new(Some(day(3, 1)), Some(day(1, 1))), None)
            .await,
        Err(EngineError::InvalidRange(_))
    ));
}

#[tokio::test]
async fn fund_percentage_is_validated() {
    let engine = test_engine().await;
    assert!(matches!(
        engine
            .create_fund(FundNew::new("Too much", 10_001))
            .await,
        Err(EngineError::InvalidPercentage(_))
    ));
}

#[tokio::test]
async fn fund_with_history_cannot_be_deleted() {
    let engine = test_engine().await;
    let main = fund(&engine, "Main", 5000).await;
    let empty = fund(&engine, "Empty", 0).await;
    engine
        .create_receipt(ReceiptNew::new(1000, day(1, 1)))
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_fund(main.id).await,
        Err(EngineError::InUse(_))
    ));
    engine.delete_fund(empty.id).await.unwrap();

    let funds = engine.list_funds(true).await.unwrap();
    assert_eq!(funds.len(), 1);
}

#[tokio::test]
async fn inactive_funds_are_hidden_unless_asked() {
    let engine = test_engine().await;
    fund(&engine, "Main", 5000).await;
    engine
        .create_fund(FundNew::new("Old", 1000).inactive())
        .await
        .unwrap();

    assert_eq!(engine.list_funds(false).await.unwrap().len(), 1);
    assert_eq!(engine.list_funds(true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn cost_takes_category_from_nomenclature() {
    let engine = test_engine().await;
    let supplies = engine
        .create_category(CategoryNew {
            name: "Supplies".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let paper = engine
        .create_nomenclature(NomenclatureNew {
            name: "Paper".to_string(),
            unit: Some("pack".to_string()),
            category_id: Some(supplies.id),
        })
        .await
        .unwrap();

    let cost = engine
        .create_cost(CostNew::new(450, day(2, 1)).nomenclature_id(paper.id))
        .await
        .unwrap();
    assert_eq!(cost.category_id, supplies.id);
    assert_eq!(cost.nomenclature_id, Some(paper.id));

    assert!(matches!(
        engine.create_cost(CostNew::new(450, day(2, 1))).await,
        Err(EngineError::InvalidName(_))
    ));
}

#[tokio::test]
async fn cost_update_and_category_filter() {
    let engine = test_engine().await;
    let rent = engine
        .create_category(CategoryNew {
            name: "Rent".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let food = engine
        .create_category(CategoryNew {
            name: "Food".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let cost = engine
        .create_cost(CostNew::new(1000, day(2, 1)).category_id(rent.id))
        .await
        .unwrap();

    let updated = engine
        .update_cost(
            cost.id,
            CostUpdate {
                amount_minor: Some(1200),
                category_id: Some(food.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 1200);
    assert_eq!(updated.category_id, food.id);

    let rent_costs = engine
        .list_costs(DateRange::all(), Some(rent.id))
        .await
        .unwrap();
    assert!(rent_costs.is_empty());
    assert_eq!(
        engine
            .list_costs(DateRange::all(), Some(food.id))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn referenced_category_and_nomenclature_cannot_be_deleted() {
    let engine = test_engine().await;
    let supplies = engine
        .create_category(CategoryNew {
            name: "Supplies".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let paper = engine
        .create_nomenclature(NomenclatureNew {
            name: "Paper".to_string(),
            unit: None,
            category_id: Some(supplies.id),
        })
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_category(supplies.id).await,
        Err(EngineError::InUse(_))
    ));

    let cost = engine
        .create_cost(CostNew::new(100, day(1, 1)).nomenclature_id(paper.id))
        .await
        .unwrap();
    assert!(matches!(
        engine.delete_nomenclature(paper.id).await,
        Err(EngineError::InUse(_))
    ));

    engine.delete_cost(cost.id).await.unwrap();
    engine.delete_nomenclature(paper.id).await.unwrap();
    engine.delete_category(supplies.id).await.unwrap();
    assert!(engine.list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn transfer_needs_two_existing_funds() {
    let engine = test_engine().await;
    let main = fund(&engine, "Main", 5000).await;
    let events = fund(&engine, "Events", 5000).await;

    let same = FundTransferNew {
        from_fund_id: main.id,
        to_fund_id: main.id,
        amount_minor: 100,
        date: day(1, 1),
        note: None,
    };
    assert!(matches!(
        engine.create_fund_transfer(same.clone()).await,
        Err(EngineError::InvalidName(_))
    ));

    let transfer = engine
        .create_fund_transfer(FundTransferNew {
            to_fund_id: events.id,
            ..same
        })
        .await
        .unwrap();

    assert!(matches!(
        engine
            .update_fund_transfer(
                transfer.id,
                FundTransferUpdate {
                    to_fund_id: Some(main.id),
                    ..Default::default()
                },
            )
            .await,
        Err(EngineError::InvalidName(_))
    ));

    let listed = engine
        .list_fund_transfers(DateRange::all(), Some(events.id))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    engine.delete_fund_transfer(transfer.id).await.unwrap();
    assert!(
        engine
            .list_fund_transfers(DateRange::all(), None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn dashboard_counts_and_activity() {
    let engine = test_engine().await;
    let main = fund(&engine, "Main", 6000).await;
    let rent = engine
        .create_category(CategoryNew {
            name: "Rent".to_string(),
            description: None,
        })
        .await
        .unwrap();
    engine
        .create_receipt(ReceiptNew::new(1000, day(1, 1)))
        .await
        .unwrap();
    engine
        .create_manual_distribution(ManualDistributionNew {
            fund_id: main.id,
            amount_minor: 100,
            date: day(1, 2),
            note: None,
        })
        .await
        .unwrap();
    engine
        .create_cost(
            CostNew::new(250, day(1, 3))
                .category_id(rent.id)
                .description("January rent"),
        )
        .await
        .unwrap();

    let stats = engine.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_receipts_minor, 1000);
    assert_eq!(stats.total_costs_minor, 250);
    assert_eq!(stats.net_balance_minor, 750);
    assert_eq!(stats.unallocated_minor, 300);
    assert_eq!(stats.active_funds, 1);
    assert_eq!(stats.receipts, 1);
    assert_eq!(stats.costs, 1);
    assert_eq!(stats.active_percentage_bp, 6000);

    let activity = engine.recent_activity(Some(2)).await.unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].kind, ActivityKind::Cost);
    assert_eq!(activity[0].description.as_deref(), Some("January rent"));
    assert_eq!(activity[1].kind, ActivityKind::ManualDistribution);

    assert_eq!(engine.recent_activity(Some(0)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn login_session_roundtrip() {
    let engine = test_engine().await;
    engine.create_user("alice", "secret").await.unwrap();

    assert_eq!(
        engine
            .login("alice", "wrong", Duration::hours(1))
            .await
            .unwrap_err(),
        EngineError::Unauthorized
    );

    let session = engine
        .login("alice", "secret", Duration::hours(1))
        .await
        .unwrap();
    let user = engine.session_user(&session.token).await.unwrap();
    assert_eq!(user.username, "alice");

    engine.logout(&session.token).await.unwrap();
    assert_eq!(
        engine.session_user(&session.token).await.unwrap_err(),
        EngineError::Unauthorized
    );
}

#[tokio::test]
async fn expired_sessions_are_rejected_and_purged() {
    let engine = test_engine().await;
    engine.create_user("alice", "secret").await.unwrap();

    let stale = engine
        .login("alice", "secret", Duration::seconds(-1))
        .await
        .unwrap();
    engine
        .login("alice", "secret", Duration::seconds(-1))
        .await
        .unwrap();
    engine
        .login("alice", "secret", Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(
        engine.session_user(&stale.token).await.unwrap_err(),
        EngineError::Unauthorized
    );
    assert_eq!(engine.purge_expired_sessions().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_user_is_rejected() {
    let engine = test_engine().await;
    engine.create_user("alice", "secret").await.unwrap();
    assert_eq!(
        engine.create_user("alice", "other").await.unwrap_err(),
        EngineError::ExistingKey("alice".to_string())
    );
}
