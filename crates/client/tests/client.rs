use api_types::{
    fund::{FundListQuery, FundNew},
    receipt::ReceiptNew,
    sponsor::{SponsorNew, SponsorUpdate},
};
use chrono::NaiveDate;
use client::{Client, ClientError};
use migration::MigratorTrait;
use sea_orm::Database;

async fn spawn_server() -> Client {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder().database(db).build().await.unwrap();
    engine.create_user("alice", "secret").await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, chrono::Duration::hours(1), listener).unwrap();
    Client::new(&format!("http://{addr}/api")).unwrap()
}

fn sponsor(name: &str) -> SponsorNew {
    SponsorNew {
        name: name.to_string(),
        contact: None,
        note: None,
    }
}

#[tokio::test]
async fn session_cookie_authenticates_requests() {
    let client = spawn_server().await;

    assert!(matches!(
        client.sponsors().await,
        Err(ClientError::Unauthorized)
    ));
    assert!(client.login("alice", "wrong").await.unwrap_err().is_unauthorized());

    let user = client.login("alice", "secret").await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(client.me().await.unwrap().username, "alice");
    assert!(client.sponsors().await.unwrap().is_empty());

    client.logout().await.unwrap();
    assert!(client.cache().is_empty());
    assert!(client.me().await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn mutations_refresh_cached_lists() {
    let client = spawn_server().await;
    client.login("alice", "secret").await.unwrap();

    let acme = client.create_sponsor(&sponsor("Acme")).await.unwrap();
    assert_eq!(client.sponsors().await.unwrap().len(), 1);
    assert_eq!(client.cache().len(), 1);

    client.create_sponsor(&sponsor("Globex")).await.unwrap();
    assert_eq!(client.sponsors().await.unwrap().len(), 2);

    let renamed = client
        .update_sponsor(
            acme.id,
            &SponsorUpdate {
                name: Some("Acme Ltd".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Acme Ltd");
    assert_eq!(client.sponsor(acme.id).await.unwrap().name, "Acme Ltd");

    let duplicate = client.create_sponsor(&sponsor("GLOBEX")).await;
    assert!(matches!(duplicate, Err(ClientError::Conflict(_))));

    client.delete_sponsor(acme.id).await.unwrap();
    assert!(matches!(
        client.sponsor(acme.id).await,
        Err(ClientError::NotFound)
    ));
}

#[tokio::test]
async fn receipts_update_unallocated_balance() {
    let client = spawn_server().await;
    client.login("alice", "secret").await.unwrap();

    client
        .create_fund(&FundNew {
            name: "Main".to_string(),
            percentage_bp: 7000,
            active: None,
            description: None,
        })
        .await
        .unwrap();

    let before = client.unallocated().await.unwrap();
    assert!(!before.can_distribute());

    let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let receipt = client
        .create_receipt(&ReceiptNew {
            amount_minor: 1000,
            date,
            sponsor_id: None,
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(receipt.distributions.len(), 1);
    assert_eq!(receipt.undistributed_minor, 300);

    let after = client.unallocated().await.unwrap();
    assert_eq!(after.unallocated_minor, 300);
    assert!(after.can_distribute());

    let funds = client.funds(&FundListQuery::default()).await.unwrap();
    assert_eq!(funds.len(), 1);

    let invalid = client
        .create_receipt(&ReceiptNew {
            amount_minor: -5,
            date,
            sponsor_id: None,
            description: None,
        })
        .await;
    assert!(matches!(invalid, Err(ClientError::Validation(_))));
}
