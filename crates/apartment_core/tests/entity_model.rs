use apartment_core::{
    Apartment, FurnishingStatus, Owner, PersonInfo, Review, Reviewer, ValidationError,
};
use chrono::{Local, NaiveDate};
use serde_json::json;

#[test]
fn new_entities_start_unsaved_and_unlinked() {
    let owner = Owner::new(PersonInfo::named("John Doe"));
    assert_eq!(owner.id(), None);
    assert!(owner.apartments().is_empty());
    assert!(!owner.is_active);
    assert!(!owner.is_business);
    assert_eq!(owner.days_as_owner, 0);
    assert_eq!(owner.person.email, None);
    assert_eq!(owner.person.age, 0);

    let apartment = Apartment::default();
    assert_eq!(apartment.id(), None);
    assert_eq!(apartment.owner(), None);
    assert_eq!(apartment.price, None);
    assert_eq!(apartment.parking_spaces, 0);
    assert!(apartment.reviews().is_empty());
}

#[test]
fn default_review_leaves_every_field_unset() {
    let review = Review::default();
    assert_eq!(review.id(), None);
    assert_eq!(review.rating, 0);
    assert_eq!(review.comment, None);
    assert_eq!(review.date, None);
    assert_eq!(review.title, None);
    assert_eq!(review.reviewer(), None);
    assert_eq!(review.apartment(), None);
}

#[test]
fn rated_review_is_dated_today() {
    let before = Local::now().date_naive();
    let review = Review::rated(4, "Great location");
    let after = Local::now().date_naive();

    assert_eq!(review.rating, 4);
    assert_eq!(review.comment.as_deref(), Some("Great location"));
    let date = review.date.unwrap();
    assert!(date == before || date == after);
}

#[test]
fn days_as_owner_is_not_derived_from_registration_date() {
    let mut owner = Owner::new(PersonInfo::named("John Doe"));
    owner.registration_date = NaiveDate::from_ymd_opt(2000, 1, 1);
    owner.days_as_owner = 7;
    assert_eq!(owner.days_as_owner, 7);
}

#[test]
fn furnishing_status_is_advisory() {
    let mut apartment = Apartment::default();
    assert_eq!(apartment.furnishing_kind(), None);

    apartment.furnishing_status = Some("Semi-Furnished ".to_string());
    assert_eq!(
        apartment.furnishing_kind(),
        Some(FurnishingStatus::SemiFurnished)
    );

    apartment.furnishing_status = Some("partly".to_string());
    assert_eq!(apartment.furnishing_kind(), None);
    assert!(apartment.validate().is_ok());

    apartment.set_furnishing(FurnishingStatus::Unfurnished);
    assert_eq!(apartment.furnishing_status.as_deref(), Some("unfurnished"));
}

#[test]
fn owner_serializes_person_fields_inline() {
    let mut owner = Owner::new(PersonInfo::new("John Doe", "john@example.com", 40));
    owner.is_active = true;
    owner.registration_date = NaiveDate::from_ymd_opt(2023, 5, 1);

    let value = serde_json::to_value(&owner).unwrap();
    assert_eq!(value["name"], "John Doe");
    assert_eq!(value["email"], "john@example.com");
    assert_eq!(value["age"], 40);
    assert_eq!(value["is_active"], true);
    assert_eq!(value["registration_date"], "2023-05-01");
    assert!(value["id"].is_null());
    assert!(value.get("apartments").is_none());
}

#[test]
fn deserialized_entities_never_carry_an_id() {
    let reviewer: Reviewer =
        serde_json::from_value(json!({ "id": 99, "name": "Ana Torres", "age": 28 })).unwrap();
    assert_eq!(reviewer.id(), None);
    assert_eq!(reviewer.person.name.as_deref(), Some("Ana Torres"));
    assert_eq!(reviewer.person.age, 28);

    let apartment: Apartment =
        serde_json::from_value(json!({ "price": 1200, "has_heating": true })).unwrap();
    assert_eq!(apartment.id(), None);
    assert_eq!(apartment.price, Some(1200));
    assert!(apartment.has_heating);
    assert!(!apartment.has_basement);
}

#[test]
fn construction_accepts_out_of_range_values() {
    let review = Review::rated(9, "off the scale");
    assert_eq!(review.rating, 9);

    let person = PersonInfo::new("Nobody", "not-an-email", -3);
    assert_eq!(person.age, -3);
}

#[test]
fn review_validation_checks_rating_range() {
    assert!(Review::rated(1, "ok").validate().is_ok());
    assert!(Review::rated(5, "ok").validate().is_ok());
    assert_eq!(
        Review::rated(0, "low").validate(),
        Err(ValidationError::RatingOutOfRange(0))
    );
    assert_eq!(
        Review::rated(6, "high").validate(),
        Err(ValidationError::RatingOutOfRange(6))
    );
}

#[test]
fn apartment_validation_rejects_negative_counts() {
    let apartment = {
        let mut apartment = Apartment::default();
        apartment.bedroom_count = Some(-1);
        apartment
    };
    assert_eq!(
        apartment.validate(),
        Err(ValidationError::NegativeAttribute {
            field: "bedroom_count",
            value: -1,
        })
    );

    let apartment = {
        let mut apartment = Apartment::default();
        apartment.parking_spaces = -2;
        apartment
    };
    assert!(matches!(
        apartment.validate(),
        Err(ValidationError::NegativeAttribute {
            field: "parking_spaces",
            ..
        })
    ));
}

#[test]
fn person_validation_checks_age_and_email() {
    assert!(PersonInfo::named("Ana Torres").validate().is_ok());
    assert!(PersonInfo::new("Ana", "ana@example.com", 28)
        .validate()
        .is_ok());
    assert_eq!(
        PersonInfo::new("Ana", "ana@example.com", -1).validate(),
        Err(ValidationError::NegativeAge(-1))
    );
    assert_eq!(
        PersonInfo::new("Ana", "ana at example", 28).validate(),
        Err(ValidationError::InvalidEmail("ana at example".to_string()))
    );

    let owner = Owner::new(PersonInfo::new("Ana", "bad", 28));
    assert!(owner.validate().is_err());
}
