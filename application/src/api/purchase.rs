//! [`Purchase`]-related definitions.

use common::{DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// A purchase.
#[derive(Clone, Debug, From, Into)]
pub struct Purchase(domain::Purchase);

/// A purchase of a `CarOffer` by a `Buyer`.
#[graphql_object(context = Context)]
impl Purchase {
    /// Unique identifier of this `Purchase`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Buyer` making this `Purchase`.
    pub fn buyer(&self) -> api::Buyer {
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        unsafe {
            api::Buyer::new_unchecked(self.0.buyer_id)
        }
    }

    /// Purchased `CarOffer`.
    pub fn car_offer(&self) -> api::CarOffer {
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        unsafe {
            api::CarOffer::new_unchecked(self.0.car_offer_id)
        }
    }

    /// Final price agreed in this `Purchase`.
    pub fn final_price(&self) -> Money {
        self.0.final_price.into()
    }

    /// `DateTime` when this `Purchase` was made.
    pub fn purchase_date(&self) -> DateTime {
        self.0.purchase_date.coerce()
    }

    /// Status of this `Purchase`: `PENDING`, `CONFIRMED`, `DELIVERED` or
    /// `CANCELLED`.
    pub fn status(&self) -> String {
        self.0.status.to_string()
    }

    /// Payment method of this `Purchase`: `CASH`, `CREDIT_CARD` or `CHECK`.
    pub fn payment_method(&self) -> String {
        self.0.payment_method.to_string()
    }

    /// Observations on this `Purchase`, if any.
    pub fn observations(&self) -> Option<String> {
        self.0.observations.as_ref().map(ToString::to_string)
    }
}

/// Unique identifier of a `Purchase`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::purchase::Id)]
#[into(domain::purchase::Id)]
#[graphql(name = "PurchaseId", transparent)]
pub struct Id(Uuid);
