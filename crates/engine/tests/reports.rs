mod common;

use common::{day, fund, test_engine};
use engine::{
    CategoryNew, CostNew, DateRange, Engine, EngineError, FundTransferNew, ManualDistributionNew,
    ReceiptNew, SponsorNew,
};
use uuid::Uuid;

async fn category(engine: &Engine, name: &str) -> Uuid {
    engine
        .create_category(CategoryNew {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn expense_report_groups_by_category() {
    let engine = test_engine().await;
    let rent = category(&engine, "Rent").await;
    let food = category(&engine, "Food").await;
    for (amount, category_id, date) in [
        (1000, rent, day(1, 5)),
        (300, food, day(1, 6)),
        (200, food, day(1, 7)),
        (900, rent, day(4, 1)),
    ] {
        engine
            .create_cost(CostNew::new(amount, date).category_id(category_id))
            .await
            .unwrap();
    }

    let report = engine
        .expense_report(DateRange::new(Some(day(1, 1)), Some(day(1, 31))))
        .await
        .unwrap();
    assert_eq!(report.total_minor, 1500);
    assert_eq!(
        report.groups.iter().map(|g| g.total_minor).sum::<i64>(),
        report.total_minor
    );
    assert_eq!(report.groups[0].key, rent);
    assert_eq!(report.groups[0].label, "Rent");
    assert_eq!(report.groups[1].count, 2);
    assert_eq!(report.groups[1].share_bp, 3333);

    let all = engine.expense_report(DateRange::all()).await.unwrap();
    assert_eq!(all.total_minor, 2400);
}

#[tokio::test]
async fn empty_range_gives_empty_report() {
    let engine = test_engine().await;
    let rent = category(&engine, "Rent").await;
    engine
        .create_cost(CostNew::new(1000, day(1, 5)).category_id(rent))
        .await
        .unwrap();

    let report = engine
        .expense_report(DateRange::new(Some(day(6, 1)), Some(day(6, 30))))
        .await
        .unwrap();
    assert!(report.is_empty());
    assert_eq!(report.total_minor, 0);

    fund(&engine, "Savings", 6000).await;
    fund(&engine, "Events", 4000).await;
    let june = engine
        .fund_balance_report(DateRange::new(Some(day(6, 1)), Some(day(6, 30))))
        .await
        .unwrap();
    assert!(june.is_empty());
    assert_eq!(june.total_balance_minor, 0);
    assert_eq!(june.receipts_minor, 0);
    assert_eq!(june.active_percentage_bp, 10_000);
    assert_eq!(june.difference_bp, 0);

    assert!(matches!(
        engine
            .sponsor_report(DateRange::new(Some(day(6, 30)), Some(day(6, 1))))
            .await,
        Err(EngineError::InvalidRange(_))
    ));
}

#[tokio::test]
async fn sponsor_report_groups_anonymous_receipts() {
    let engine = test_engine().await;
    let acme = engine.create_sponsor(SponsorNew::new("Acme")).await.unwrap();
    engine
        .create_receipt(ReceiptNew::new(500, day(2, 1)).sponsor_id(acme.id))
        .await
        .unwrap();
    engine
        .create_receipt(ReceiptNew::new(700, day(2, 2)).sponsor_id(acme.id))
        .await
        .unwrap();
    engine
        .create_receipt(ReceiptNew::new(300, day(2, 3)))
        .await
        .unwrap();

    let report = engine.sponsor_report(DateRange::all()).await.unwrap();
    assert_eq!(report.total_minor, 1500);
    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.groups[0].key, Some(acme.id));
    assert_eq!(report.groups[0].total_minor, 1200);
    assert_eq!(report.groups[0].share_bp, 8000);
    assert_eq!(report.groups[1].key, None);
    assert_eq!(report.groups[1].label, "Anonymous");
}

#[tokio::test]
async fn fund_balance_report_tracks_every_movement() {
    let engine = test_engine().await;
    let main = fund(&engine, "Main", 6000).await;
    let events = fund(&engine, "Events", 3000).await;
    let rent = category(&engine, "Rent").await;

    engine
        .create_receipt(ReceiptNew::new(10_000, day(3, 1)))
        .await
        .unwrap();
    engine
        .create_manual_distribution(ManualDistributionNew {
            fund_id: events.id,
            amount_minor: 400,
            date: day(3, 2),
            note: None,
        })
        .await
        .unwrap();
    engine
        .create_fund_transfer(FundTransferNew {
            from_fund_id: main.id,
            to_fund_id: events.id,
            amount_minor: 1000,
            date: day(3, 3),
            note: None,
        })
        .await
        .unwrap();
    engine
        .create_cost(
            CostNew::new(2500, day(3, 4))
                .category_id(rent)
                .fund_id(events.id),
        )
        .await
        .unwrap();

    let report = engine.fund_balance_report(DateRange::all()).await.unwrap();
    assert_eq!(report.active_percentage_bp, 9000);
    assert_eq!(report.difference_bp, 1000);
    assert_eq!(report.receipts_minor, 10_000);
    assert_eq!(report.unallocated_minor, 600);

    let events_row = report.rows.iter().find(|r| r.fund_id == events.id).unwrap();
    assert_eq!(events_row.auto_minor, 3000);
    assert_eq!(events_row.manual_minor, 400);
    assert_eq!(events_row.transfers_in_minor, 1000);
    assert_eq!(events_row.costs_minor, 2500);
    assert_eq!(events_row.balance_minor(), 3000 + 400 + 1000 - 2500);

    let main_row = report.rows.iter().find(|r| r.fund_id == main.id).unwrap();
    assert_eq!(main_row.balance_minor(), 6000 - 1000);
    assert_eq!(report.total_balance_minor, 1900 + 5000);
}

#[tokio::test]
async fn fund_balance_report_dates_auto_distributions_by_receipt() {
    let engine = test_engine().await;
    let main = fund(&engine, "Main", 5000).await;
    engine
        .create_receipt(ReceiptNew::new(1000, day(1, 15)))
        .await
        .unwrap();
    engine
        .create_receipt(ReceiptNew::new(4000, day(2, 15)))
        .await
        .unwrap();

    let february = engine
        .fund_balance_report(DateRange::new(Some(day(2, 1)), Some(day(2, 28))))
        .await
        .unwrap();
    let row = february.rows.iter().find(|r| r.fund_id == main.id).unwrap();
    assert_eq!(row.auto_minor, 2000);
    assert_eq!(february.receipts_minor, 4000);
    assert_eq!(february.unallocated_minor, 2000);
}
