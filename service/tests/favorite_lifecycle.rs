mod support;

use service::{
    command::{
        DeleteFavoriteCar, SaveFavoriteCar, SetFavoriteCarNotifications,
        UpdateFavoriteCarReview,
    },
    domain::{car, Buyer, Car, FavoriteCar},
    error::Categorized as _,
    infra::Memory,
    query, Category, Command as _, Service,
};

use self::support::{buyer, car, service};

fn favorite(buyer: &Buyer, car: &Car) -> SaveFavoriteCar {
    SaveFavoriteCar {
        buyer_id: buyer.id,
        car_id: car.id,
        rating: Some(8),
        comment: Some("Comfortable for long trips".into()),
        date_added: None,
        price_notifications: false,
    }
}

async fn saved() -> (Service<Memory>, FavoriteCar) {
    let svc = service();
    let buyer = buyer(&svc).await;
    let car = car(&svc).await;
    let favorite = svc.execute(favorite(&buyer, &car)).await.unwrap();
    (svc, favorite)
}

#[tokio::test]
async fn car_is_favorited_once() {
    let svc = service();
    let buyer = buyer(&svc).await;
    let car = car(&svc).await;
    _ = svc.execute(favorite(&buyer, &car)).await.unwrap();

    let err = svc.execute(favorite(&buyer, &car)).await.unwrap_err();

    assert_eq!(err.category(), Category::DuplicateFavorite);
    assert!(err.as_ref().to_string().contains("already in favorites"));
    let favorites = svc
        .execute(query::favorite_car::ByBuyer::by(buyer.id))
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);
}

#[tokio::test]
async fn blank_comment_is_dropped() {
    let svc = service();
    let buyer = buyer(&svc).await;
    let car = car(&svc).await;

    let saved = svc
        .execute(SaveFavoriteCar {
            rating: None,
            comment: Some("   ".into()),
            ..favorite(&buyer, &car)
        })
        .await
        .unwrap();

    assert!(saved.rating.is_none());
    assert!(saved.comment.is_none());
}

#[tokio::test]
async fn comment_is_stored_trimmed() {
    let svc = service();
    let buyer = buyer(&svc).await;
    let car = car(&svc).await;

    let saved = svc
        .execute(SaveFavoriteCar {
            comment: Some("  nice  ".into()),
            ..favorite(&buyer, &car)
        })
        .await
        .unwrap();

    assert_eq!(saved.comment.map(|c| c.to_string()), Some("nice".into()));
}

#[tokio::test]
async fn out_of_range_rating_is_invalid() {
    let svc = service();
    let buyer = buyer(&svc).await;
    let car = car(&svc).await;

    let err = svc
        .execute(SaveFavoriteCar {
            rating: Some(70_000),
            ..favorite(&buyer, &car)
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::Validation);
    assert_eq!(err.as_ref().to_string(), "Rating must be between 0 and 10");
}

#[tokio::test]
async fn unknown_car_is_not_found() {
    let svc = service();
    let buyer = buyer(&svc).await;

    let err = svc
        .execute(SaveFavoriteCar {
            buyer_id: buyer.id,
            car_id: car::Id::new(),
            rating: None,
            comment: None,
            date_added: None,
            price_notifications: true,
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::NotFound);
}

#[tokio::test]
async fn out_of_range_rating_keeps_review() {
    let (svc, favorite) = saved().await;

    let err = svc
        .execute(UpdateFavoriteCarReview {
            favorite_car_id: favorite.id,
            rating: Some(Some(11)),
            comment: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), Category::Validation);
    assert_eq!(
        err.as_ref().to_string(),
        "Rating must be between 0 and 10",
    );
    let stored = svc
        .execute(query::favorite_car::ById::by(favorite.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating, favorite.rating);
}

#[tokio::test]
async fn review_is_updated_partially() {
    let (svc, favorite) = saved().await;

    let updated = svc
        .execute(UpdateFavoriteCarReview {
            favorite_car_id: favorite.id,
            rating: Some(Some(10)),
            comment: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.comment, favorite.comment);
    assert_eq!(updated.rating.map(i16::from), Some(10));

    let updated = svc
        .execute(UpdateFavoriteCarReview {
            favorite_car_id: favorite.id,
            rating: Some(None),
            comment: Some(None),
        })
        .await
        .unwrap();
    assert!(updated.rating.is_none());
    assert!(updated.comment.is_none());
}

#[tokio::test]
async fn notifications_are_switched() {
    let (svc, favorite) = saved().await;

    for _ in 0..2 {
        let updated = svc
            .execute(SetFavoriteCarNotifications::enable(favorite.id))
            .await
            .unwrap();
        assert!(updated.price_notifications);
    }

    let updated = svc
        .execute(SetFavoriteCarNotifications::disable(favorite.id))
        .await
        .unwrap();
    assert!(!updated.price_notifications);
}

#[tokio::test]
async fn deleted_favorite_is_gone() {
    let (svc, favorite) = saved().await;

    _ = svc
        .execute(DeleteFavoriteCar {
            favorite_car_id: favorite.id,
        })
        .await
        .unwrap();

    let err = svc
        .execute(DeleteFavoriteCar {
            favorite_car_id: favorite.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::NotFound);

    let err = svc
        .execute(SetFavoriteCarNotifications::enable(favorite.id))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::NotFound);
}
