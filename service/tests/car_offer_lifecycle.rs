mod support;

use std::time::Duration;

use common::DateTime;
use service::{
    command::{
        create_car_offer, ChangeCarOfferAvailability,
        ChangeDealershipActivity, CreateCarOffer, DeleteCarOffer,
        TransitPurchase, UpdateCarOffer,
    },
    domain::{car, Dealership},
    error::Categorized as _,
    query, Category, Command as _,
};

use self::support::{
    car, dealership, money, offer, purchase, reload, service, Interleaved,
    Market,
};

#[tokio::test]
async fn second_offer_of_same_car_is_duplicate() {
    let m = Market::open().await;

    let err = m
        .svc
        .execute(CreateCarOffer {
            car_id: m.car.id,
            dealership_id: m.dealership.id,
            price: money("19999.99"),
            notes: None,
            offer_date: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::DuplicateOffer);
}

#[tokio::test]
async fn same_car_is_offered_by_different_dealerships() {
    let m = Market::open().await;
    let other = dealership(&m.svc).await;

    let second = offer(&m.svc, &m.car, &other).await;

    assert!(second.available);
    let offers = m
        .svc
        .execute(query::car_offer::ByCar::by(m.car.id))
        .await
        .unwrap();
    assert_eq!(offers.len(), 2);
}

#[tokio::test]
async fn inactive_dealership_cannot_offer() {
    let svc = service();
    let car = car(&svc).await;
    let dealership = dealership(&svc).await;
    _ = svc
        .execute(ChangeDealershipActivity::deactivate(dealership.id))
        .await
        .unwrap();

    let err = svc
        .execute(CreateCarOffer {
            car_id: car.id,
            dealership_id: dealership.id,
            price: money("25000"),
            notes: None,
            offer_date: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::Validation);
}

#[tokio::test]
async fn dealership_deactivated_concurrently_cannot_offer() {
    let svc = service();
    let car = car(&svc).await;
    let dealership = dealership(&svc).await;
    let interleaved = Interleaved::service(
        &svc,
        Dealership {
            active: false,
            ..dealership.clone()
        },
    );

    let err = interleaved
        .execute(CreateCarOffer {
            car_id: car.id,
            dealership_id: dealership.id,
            price: money("25000"),
            notes: None,
            offer_date: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::Validation);
    assert!(matches!(
        err.as_ref(),
        create_car_offer::ExecutionError::DealershipInactive(id)
            if *id == dealership.id,
    ));
    let offers = svc
        .execute(query::car_offer::ByCar::by(car.id))
        .await
        .unwrap();
    assert!(offers.is_empty());
}

#[tokio::test]
async fn offer_rejects_invalid_terms() {
    let svc = service();
    let car = car(&svc).await;
    let dealership = dealership(&svc).await;
    let create = |price: &str| CreateCarOffer {
        car_id: car.id,
        dealership_id: dealership.id,
        price: money(price),
        notes: None,
        offer_date: None,
    };

    for price in ["0", "-1", "100000000.00", "10.001"] {
        let err = svc.execute(create(price)).await.unwrap_err();
        assert_eq!(err.category(), Category::Validation, "{price}");
    }

    let err = svc
        .execute(CreateCarOffer {
            offer_date: Some(
                (DateTime::now() + Duration::from_secs(60 * 60)).coerce(),
            ),
            ..create("25000")
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::Validation);

    let err = svc
        .execute(CreateCarOffer {
            notes: Some("x".repeat(1001)),
            ..create("25000")
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::Validation);

    let err = svc
        .execute(CreateCarOffer {
            car_id: car::Id::new(),
            ..create("25000")
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::NotFound);
}

#[tokio::test]
async fn marking_unavailable_is_idempotent() {
    let m = Market::open().await;

    for _ in 0..2 {
        let offer = m
            .svc
            .execute(ChangeCarOfferAvailability::mark_unavailable(m.offer.id))
            .await
            .unwrap();
        assert!(!offer.available);
    }

    let offer = m
        .svc
        .execute(ChangeCarOfferAvailability::mark_available(m.offer.id))
        .await
        .unwrap();
    assert!(offer.available);
}

#[tokio::test]
async fn held_offer_cannot_be_marked_available() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;

    let err = m
        .svc
        .execute(ChangeCarOfferAvailability::mark_available(m.offer.id))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::BusinessRule);
    assert!(!reload(&m.svc, &m.offer).await.available);

    _ = m.svc.execute(TransitPurchase::cancel(p.id)).await.unwrap();
    let offer = m
        .svc
        .execute(ChangeCarOfferAvailability::mark_unavailable(m.offer.id))
        .await
        .unwrap();
    assert!(!offer.available);
}

#[tokio::test]
async fn price_update_keeps_availability() {
    let m = Market::open().await;
    _ = purchase(&m.svc, &m.buyer, &m.offer).await;

    let offer = m
        .svc
        .execute(UpdateCarOffer {
            car_offer_id: m.offer.id,
            price: Some(money("23000.00")),
            notes: Some(Some("Price drop".into())),
        })
        .await
        .unwrap();

    assert_eq!(offer.price.to_string(), "23000.00");
    assert!(!offer.available);

    let err = m
        .svc
        .execute(UpdateCarOffer {
            car_offer_id: m.offer.id,
            price: Some(money("0.001")),
            notes: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::Validation);
    assert_eq!(
        reload(&m.svc, &m.offer).await.price.to_string(),
        "23000.00",
    );
}

#[tokio::test]
async fn purchased_offer_cannot_be_deleted() {
    let m = Market::open().await;
    let p = purchase(&m.svc, &m.buyer, &m.offer).await;
    _ = m.svc.execute(TransitPurchase::cancel(p.id)).await.unwrap();

    let err = m
        .svc
        .execute(DeleteCarOffer {
            car_offer_id: m.offer.id,
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::BusinessRule);
}

#[tokio::test]
async fn unpurchased_offer_is_deleted() {
    let m = Market::open().await;

    _ = m
        .svc
        .execute(DeleteCarOffer {
            car_offer_id: m.offer.id,
        })
        .await
        .unwrap();

    let stored = m
        .svc
        .execute(query::car_offer::ById::by(m.offer.id))
        .await
        .unwrap();
    assert!(stored.is_none());

    let err = m
        .svc
        .execute(DeleteCarOffer {
            car_offer_id: m.offer.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::NotFound);
}

#[tokio::test]
async fn only_available_offers_are_listed() {
    let m = Market::open().await;
    let other_car = car(&m.svc).await;
    let other = offer(&m.svc, &other_car, &m.dealership).await;
    _ = purchase(&m.svc, &m.buyer, &m.offer).await;

    let available = m
        .svc
        .execute(query::car_offer::Available::by(
            service::read::car_offer::Available,
        ))
        .await
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, other.id);

    let by_dealership = m
        .svc
        .execute(query::car_offer::ByDealership::by(m.dealership.id))
        .await
        .unwrap();
    assert_eq!(by_dealership.len(), 2);
}
