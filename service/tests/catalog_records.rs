mod support;

use service::{
    command::{
        ChangeBuyerActivity, ChangeDealershipActivity, CreateBuyer, CreateCar,
        CreateDealership,
    },
    domain::dealership,
    error::Categorized as _,
    query, Category, Command as _,
};

use self::support::{buyer, car, dealership, service};

#[tokio::test]
async fn records_are_found_by_id() {
    let svc = service();
    let buyer = buyer(&svc).await;
    let dealership = dealership(&svc).await;
    let car = car(&svc).await;

    let found = svc
        .execute(query::buyer::ById::by(buyer.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.dni, buyer.dni);
    assert!(found.active);

    let found = svc
        .execute(query::dealership::ById::by(dealership.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.cuit, dealership.cuit);

    let found = svc
        .execute(query::car::ById::by(car.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.image_urls.len(), 1);
}

#[tokio::test]
async fn redundant_activation_is_rejected() {
    let svc = service();
    let dealership = dealership(&svc).await;

    let err = svc
        .execute(ChangeDealershipActivity::activate(dealership.id))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::BusinessRule);

    let deactivated = svc
        .execute(ChangeDealershipActivity::deactivate(dealership.id))
        .await
        .unwrap();
    assert!(!deactivated.active);

    let err = svc
        .execute(ChangeDealershipActivity::deactivate(dealership.id))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::BusinessRule);

    let err = svc
        .execute(ChangeDealershipActivity::activate(dealership::Id::new()))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::NotFound);
}

#[tokio::test]
async fn redundant_buyer_activation_is_rejected() {
    let svc = service();
    let buyer = buyer(&svc).await;

    let err = svc
        .execute(ChangeBuyerActivity::activate(buyer.id))
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::BusinessRule);

    let deactivated = svc
        .execute(ChangeBuyerActivity::deactivate(buyer.id))
        .await
        .unwrap();
    assert!(!deactivated.active);
}

#[tokio::test]
async fn malformed_records_are_rejected() {
    let svc = service();

    let err = svc
        .execute(CreateBuyer {
            first_name: "Ana".into(),
            last_name: "  ".into(),
            dni: "30123456".into(),
            address: "Calle 1".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::Validation);
    assert_eq!(err.as_ref().to_string(), "Last name must not be blank");

    let err = svc
        .execute(CreateDealership {
            name: "Autos".into(),
            cuit: "30-71234567-8".into(),
            address: "Calle 1".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::Validation);

    let car = |fuel_type: &str, year: i32, url: &str| CreateCar {
        brand: "Ford".into(),
        model: "Falcon".into(),
        year,
        color: "Blue".into(),
        fuel_type: fuel_type.into(),
        transmission: "MANUAL".into(),
        description: None,
        image_urls: vec![url.into()],
    };
    for cmd in [
        car("STEAM", 1980, "https://img.example.com/a.png"),
        car("DIESEL", 1885, "https://img.example.com/a.png"),
        car("DIESEL", 1980, "ftp://img.example.com/a.png"),
    ] {
        let err = svc.execute(cmd).await.unwrap_err();
        assert_eq!(err.category(), Category::Validation);
    }

    let err = svc
        .execute(car("STEAM", 1980, "https://img.example.com/a.png"))
        .await
        .unwrap_err();
    assert!(err.as_ref().to_string().contains("GASOLINE"));
}
