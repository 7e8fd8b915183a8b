mod support;

use service::{
    command::{
        create_purchase, ChangeBuyerActivity, ChangeDealershipActivity,
        DeletePurchase, TransitPurchase, UpdatePurchase,
    },
    domain::{buyer, purchase::Status, Buyer, Dealership},
    error::Categorized as _,
    query, Category, Command as _,
};

use self::support::{
    money, purchase, purchase_of, reload, Interleaved, Market,
};

#[tokio::test]
async fn purchase_holds_offer() {
    let m = Market::open().await;
    assert!(m.offer.available);

    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    assert_eq!(p.status, Status::Pending);
    assert!(!reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn cancel_releases_offer() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    let p = m.svc.execute(TransitPurchase::cancel(p.id)).await.unwrap();

    assert_eq!(p.status, Status::Cancelled);
    assert!(reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn zero_price_persists_nothing() {
    let m = Market::open().await;

    let err = m
        .svc
        .execute(service::command::CreatePurchase {
            final_price: money("0"),
            ..purchase_of(&m.buyer, &m.offer)
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::Validation);
    assert_eq!(
        err.as_ref().to_string(),
        "Final price must be greater than zero",
    );
    assert!(reload(&m.svc, &m.offer).await.available);
    let purchases = m
        .svc
        .execute(query::purchase::ByCarOffer::by(m.offer.id))
        .await
        .unwrap();
    assert!(purchases.is_empty());
}

#[tokio::test]
async fn held_offer_cannot_be_purchased_again() {
    let m = Market::open().await;
    _ = purchase(&m.svc, &m.buyer, &m.offer).await;

    let err = m
        .svc
        .execute(purchase_of(&m.buyer, &m.offer))
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::BusinessRule);
    assert_eq!(
        err.as_ref().to_string(),
        "Car offer is not available for purchase",
    );
}

#[tokio::test]
async fn only_one_of_concurrent_purchases_succeeds() {
    let m = Market::open().await;

    let (first, second) = tokio::join!(
        m.svc.execute(purchase_of(&m.buyer, &m.offer)),
        m.svc.execute(purchase_of(&m.buyer, &m.offer)),
    );

    assert_eq!(u8::from(first.is_ok()) + u8::from(second.is_ok()), 1);
    let err = first.err().or(second.err()).unwrap();
    assert_eq!(err.category(), Category::BusinessRule);
    assert!(!reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn confirmed_purchase_is_delivered() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    let p = m.svc.execute(TransitPurchase::confirm(p.id)).await.unwrap();
    assert_eq!(p.status, Status::Confirmed);
    assert!(!reload(&m.svc, &m.offer).await.available);

    let p = m.svc.execute(TransitPurchase::deliver(p.id)).await.unwrap();
    assert_eq!(p.status, Status::Delivered);
    assert!(!reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn pending_purchase_cannot_be_delivered() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    let err = m
        .svc
        .execute(TransitPurchase::deliver(p.id))
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::StateConflict);
    let stored = m
        .svc
        .execute(query::purchase::ById::by(p.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, Status::Pending);
}

#[tokio::test]
async fn terminal_statuses_are_absorbing() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;
    _ = m.svc.execute(TransitPurchase::cancel(p.id)).await.unwrap();

    for cmd in [
        TransitPurchase::confirm(p.id),
        TransitPurchase::deliver(p.id),
        TransitPurchase::revert_to_pending(p.id),
        TransitPurchase::cancel(p.id),
    ] {
        let err = m.svc.execute(cmd).await.unwrap_err();
        assert_eq!(err.category(), Category::StateConflict);
    }
    assert!(reload(&m.svc, &m.offer).await.available);

    let other = purchase(&m.svc, &m.buyer, &m.offer).await;
    _ = m.svc.execute(TransitPurchase::confirm(other.id)).await.unwrap();
    _ = m.svc.execute(TransitPurchase::deliver(other.id)).await.unwrap();

    let err = m
        .svc
        .execute(TransitPurchase::cancel(other.id))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::StateConflict);
    assert_eq!(
        err.as_ref().to_string(),
        "Cannot change purchase status from DELIVERED to CANCELLED",
    );
}

#[tokio::test]
async fn reverted_purchase_keeps_holding_offer() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;
    _ = m.svc.execute(TransitPurchase::confirm(p.id)).await.unwrap();

    let p = m
        .svc
        .execute(TransitPurchase::revert_to_pending(p.id))
        .await
        .unwrap();

    assert_eq!(p.status, Status::Pending);
    assert!(!reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn deleted_purchase_releases_offer() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    _ = m
        .svc
        .execute(DeletePurchase { purchase_id: p.id })
        .await
        .unwrap();

    assert!(reload(&m.svc, &m.offer).await.available);
    let err = m
        .svc
        .execute(DeletePurchase { purchase_id: p.id })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::NotFound);
}

#[tokio::test]
async fn deleting_stale_purchase_keeps_active_one() {
    let m = Market::open().await;
    let stale = purchase(&m.svc, &m.buyer, &m.offer).await;
    _ = m.svc.execute(TransitPurchase::cancel(stale.id)).await.unwrap();
    _ = purchase(&m.svc, &m.buyer, &m.offer).await;

    _ = m
        .svc
        .execute(DeletePurchase {
            purchase_id: stale.id,
        })
        .await
        .unwrap();

    assert!(!reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn update_applies_fields_and_status() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    let p = m
        .svc
        .execute(UpdatePurchase {
            purchase_id: p.id,
            final_price: Some(money("24500.50")),
            payment_method: Some("CREDIT_CARD".into()),
            status: Some("CANCELLED".into()),
            observations: Some(Some("Financed in 12 installments".into())),
            ..UpdatePurchase::default()
        })
        .await
        .unwrap();

    assert_eq!(p.status, Status::Cancelled);
    assert_eq!(p.final_price.to_string(), "24500.50");
    assert_eq!(p.payment_method.to_string(), "CREDIT_CARD");
    assert!(p.observations.is_some());
    assert!(reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn failed_update_persists_nothing() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    let err = m
        .svc
        .execute(UpdatePurchase {
            purchase_id: p.id,
            final_price: Some(money("1000")),
            payment_method: Some("BARTER".into()),
            ..UpdatePurchase::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::Validation);
    assert!(err.as_ref().to_string().contains("BARTER"));

    let err = m
        .svc
        .execute(UpdatePurchase {
            purchase_id: p.id,
            final_price: Some(money("1000")),
            status: Some("DELIVERED".into()),
            ..UpdatePurchase::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::StateConflict);

    let stored = m
        .svc
        .execute(query::purchase::ById::by(p.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.final_price, p.final_price);
    assert_eq!(stored.status, Status::Pending);
}

#[tokio::test]
async fn inactive_parties_cannot_purchase() {
    let m = Market::open().await;

    _ = m
        .svc
        .execute(ChangeBuyerActivity::deactivate(m.buyer.id))
        .await
        .unwrap();
    let err = m
        .svc
        .execute(purchase_of(&m.buyer, &m.offer))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::BusinessRule);

    _ = m
        .svc
        .execute(ChangeBuyerActivity::activate(m.buyer.id))
        .await
        .unwrap();
    _ = m
        .svc
        .execute(ChangeDealershipActivity::deactivate(m.dealership.id))
        .await
        .unwrap();
    let err = m
        .svc
        .execute(purchase_of(&m.buyer, &m.offer))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::BusinessRule);
    assert!(reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn buyer_deactivated_concurrently_cannot_purchase() {
    let m = Market::open().await;
    let svc = Interleaved::service(
        &m.svc,
        Buyer {
            active: false,
            ..m.buyer.clone()
        },
    );

    let err = svc
        .execute(purchase_of(&m.buyer, &m.offer))
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::BusinessRule);
    assert!(matches!(
        err.as_ref(),
        create_purchase::ExecutionError::BuyerInactive(id)
            if *id == m.buyer.id,
    ));
    assert!(reload(&m.svc, &m.offer).await.available);
}

#[tokio::test]
async fn dealership_deactivated_concurrently_cannot_sell() {
    let m = Market::open().await;
    let svc = Interleaved::service(
        &m.svc,
        Dealership {
            active: false,
            ..m.dealership.clone()
        },
    );

    let err = svc
        .execute(purchase_of(&m.buyer, &m.offer))
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::BusinessRule);
    assert!(matches!(
        err.as_ref(),
        create_purchase::ExecutionError::DealershipInactive(id)
            if *id == m.dealership.id,
    ));
    let purchases = m
        .svc
        .execute(query::purchase::ByCarOffer::by(m.offer.id))
        .await
        .unwrap();
    assert!(purchases.is_empty());
}

#[tokio::test]
async fn unknown_buyer_is_not_found() {
    let m = Market::open().await;
    let mut cmd = purchase_of(&m.buyer, &m.offer);
    cmd.buyer_id = buyer::Id::new();

    let err = m.svc.execute(cmd).await.unwrap_err();

    assert_eq!(err.category(), Category::NotFound);
}

#[tokio::test]
async fn purchases_are_listed_by_buyer() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    let purchases = m
        .svc
        .execute(query::purchase::ByBuyer::by(m.buyer.id))
        .await
        .unwrap();

    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].id, p.id);
}
