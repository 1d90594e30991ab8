use apartment_core::{
    Apartment, GraphError, Owner, OwnerKey, PersonInfo, RentalGraph, Review, Reviewer,
    ReviewerKey,
};

fn john_doe(graph: &mut RentalGraph) -> OwnerKey {
    graph.insert_owner(Owner::new(PersonInfo::named("John Doe")))
}

fn ana_torres(graph: &mut RentalGraph) -> ReviewerKey {
    graph.insert_reviewer(Reviewer::new(PersonInfo::new(
        "Ana Torres",
        "ana.torres@example.com",
        28,
    )))
}

#[test]
fn add_apartment_links_both_sides() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());

    graph.add_apartment(owner, apartment).unwrap();

    assert_eq!(graph.apartment(apartment).unwrap().owner(), Some(owner));
    assert!(graph.owner(owner).unwrap().apartments().contains(&apartment));
}

#[test]
fn add_review_to_reviewer_links_both_sides() {
    let mut graph = RentalGraph::new();
    let reviewer = ana_torres(&mut graph);
    let review = graph.insert_review(Review::rated(4, "Cozy"));

    graph.add_review_to_reviewer(reviewer, review).unwrap();

    assert_eq!(graph.review(review).unwrap().reviewer(), Some(reviewer));
    assert!(graph.reviewer(reviewer).unwrap().reviews().contains(&review));
}

#[test]
fn add_review_to_apartment_links_both_sides() {
    let mut graph = RentalGraph::new();
    let apartment = graph.insert_apartment(Apartment::default());
    let review = graph.insert_review(Review::rated(2, "Cold in winter"));

    graph.add_review_to_apartment(apartment, review).unwrap();

    assert_eq!(graph.review(review).unwrap().apartment(), Some(apartment));
    assert!(graph.apartment(apartment).unwrap().reviews().contains(&review));
}

#[test]
fn john_doe_holds_two_distinct_apartments() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let first = graph.insert_apartment({
        let mut apartment = Apartment::default();
        apartment.price = Some(1500);
        apartment
    });
    let second = graph.insert_apartment({
        let mut apartment = Apartment::default();
        apartment.price = Some(900);
        apartment
    });

    graph.add_apartment(owner, first).unwrap();
    graph.add_apartment(owner, second).unwrap();

    let held = graph.owner(owner).unwrap().apartments();
    assert_eq!(held, &[first, second]);
    for apartment in held {
        assert_eq!(graph.apartment(*apartment).unwrap().owner(), Some(owner));
    }
}

#[test]
fn ana_torres_authors_two_reviews_before_any_save() {
    let mut graph = RentalGraph::new();
    let reviewer = ana_torres(&mut graph);
    let first = graph.insert_review(Review::rated(5, "Bright"));
    let second = graph.insert_review(Review::rated(3, "Noisy"));

    graph.add_review_to_reviewer(reviewer, first).unwrap();
    graph.add_review_to_reviewer(reviewer, second).unwrap();

    let entry = graph.reviewer(reviewer).unwrap();
    assert_eq!(entry.person.age, 28);
    assert_eq!(entry.id(), None);
    assert_eq!(entry.reviews().len(), 2);
    for review in [first, second] {
        assert_eq!(graph.review(review).unwrap().reviewer(), Some(reviewer));
    }
}

#[test]
fn adding_same_apartment_twice_keeps_both_entries() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());

    graph.add_apartment(owner, apartment).unwrap();
    graph.add_apartment(owner, apartment).unwrap();

    assert_eq!(
        graph.owner(owner).unwrap().apartments(),
        &[apartment, apartment]
    );
}

#[test]
fn linking_to_a_different_parent_is_rejected_without_changes() {
    let mut graph = RentalGraph::new();
    let john = john_doe(&mut graph);
    let other = graph.insert_owner(Owner::new(PersonInfo::named("Mary Major")));
    let apartment = graph.insert_apartment(Apartment::default());
    graph.add_apartment(john, apartment).unwrap();

    let err = graph.add_apartment(other, apartment).unwrap_err();
    assert_eq!(
        err,
        GraphError::ApartmentHasOtherOwner {
            apartment,
            owner: john,
        }
    );
    assert_eq!(graph.apartment(apartment).unwrap().owner(), Some(john));
    assert!(graph.owner(other).unwrap().apartments().is_empty());

    let ana = ana_torres(&mut graph);
    let bob = graph.insert_reviewer(Reviewer::new(PersonInfo::named("Bob")));
    let review = graph.insert_review(Review::rated(4, "Fine"));
    graph.add_review_to_reviewer(ana, review).unwrap();
    assert!(matches!(
        graph.add_review_to_reviewer(bob, review),
        Err(GraphError::ReviewHasOtherReviewer { .. })
    ));

    let second_home = graph.insert_apartment(Apartment::default());
    graph.add_review_to_apartment(apartment, review).unwrap();
    assert!(matches!(
        graph.add_review_to_apartment(second_home, review),
        Err(GraphError::ReviewHasOtherApartment { .. })
    ));
    assert!(graph.apartment(second_home).unwrap().reviews().is_empty());
}

#[test]
fn unknown_keys_are_reported() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());
    graph.delete_apartment(apartment).unwrap();

    assert_eq!(
        graph.add_apartment(owner, apartment),
        Err(GraphError::UnknownApartment(apartment))
    );
    assert!(graph.owner(owner).unwrap().apartments().is_empty());
}

#[test]
fn insert_discards_carried_relationships() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());
    graph.add_apartment(owner, apartment).unwrap();

    let copy = graph.apartment(apartment).unwrap().clone();
    let copy_key = graph.insert_apartment(copy);

    assert_ne!(copy_key, apartment);
    assert_eq!(graph.apartment(copy_key).unwrap().owner(), None);
    assert_eq!(graph.owner(owner).unwrap().apartments(), &[apartment]);
}

#[test]
fn remove_apartment_deletes_it_with_its_reviews() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let reviewer = ana_torres(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());
    let review = graph.insert_review(Review::rated(5, "Lovely"));
    graph.add_apartment(owner, apartment).unwrap();
    graph.add_review_to_apartment(apartment, review).unwrap();
    graph.add_review_to_reviewer(reviewer, review).unwrap();

    assert!(graph.remove_apartment(owner, apartment).unwrap());

    assert!(graph.apartment(apartment).is_none());
    assert!(graph.review(review).is_none());
    assert!(graph.owner(owner).unwrap().apartments().is_empty());
    assert!(graph.reviewer(reviewer).unwrap().reviews().is_empty());
    // Nothing was saved, so nothing is queued.
    assert!(graph.pending_deletions().is_empty());
}

#[test]
fn remove_reports_false_for_children_of_other_parents() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());
    let reviewer = ana_torres(&mut graph);
    let review = graph.insert_review(Review::rated(3, "Meh"));

    assert!(!graph.remove_apartment(owner, apartment).unwrap());
    assert!(!graph.remove_review_from_reviewer(reviewer, review).unwrap());
    assert!(!graph.remove_review_from_apartment(apartment, review).unwrap());
    assert!(graph.apartment(apartment).is_some());
    assert!(graph.review(review).is_some());
}

#[test]
fn removing_review_from_one_parent_detaches_it_from_the_other() {
    let mut graph = RentalGraph::new();
    let reviewer = ana_torres(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());
    let review = graph.insert_review(Review::rated(4, "Good"));
    graph.add_review_to_reviewer(reviewer, review).unwrap();
    graph.add_review_to_apartment(apartment, review).unwrap();

    assert!(graph.remove_review_from_apartment(apartment, review).unwrap());

    assert!(graph.review(review).is_none());
    assert!(graph.reviewer(reviewer).unwrap().reviews().is_empty());
    assert!(graph.apartment(apartment).unwrap().reviews().is_empty());
}

#[test]
fn delete_owner_cascades_to_apartments_and_reviews() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let reviewer = ana_torres(&mut graph);
    let first = graph.insert_apartment(Apartment::default());
    let second = graph.insert_apartment(Apartment::default());
    let review = graph.insert_review(Review::rated(5, "Best"));
    graph.add_apartment(owner, first).unwrap();
    graph.add_apartment(owner, second).unwrap();
    graph.add_review_to_apartment(second, review).unwrap();
    graph.add_review_to_reviewer(reviewer, review).unwrap();

    graph.delete_owner(owner).unwrap();

    assert_eq!(graph.owners().count(), 0);
    assert_eq!(graph.apartments().count(), 0);
    assert_eq!(graph.reviews().count(), 0);
    assert!(graph.reviewer(reviewer).unwrap().reviews().is_empty());
}

#[test]
fn delete_reviewer_leaves_apartments_in_place() {
    let mut graph = RentalGraph::new();
    let reviewer = ana_torres(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());
    let review = graph.insert_review(Review::rated(1, "Leaky roof"));
    graph.add_review_to_reviewer(reviewer, review).unwrap();
    graph.add_review_to_apartment(apartment, review).unwrap();

    graph.delete_reviewer(reviewer).unwrap();

    assert!(graph.reviewer(reviewer).is_none());
    assert!(graph.review(review).is_none());
    assert!(graph.apartment(apartment).unwrap().reviews().is_empty());
}

#[test]
fn deleting_twice_reports_unknown_key() {
    let mut graph = RentalGraph::new();
    let review = graph.insert_review(Review::default());

    graph.delete_review(review).unwrap();
    assert_eq!(
        graph.delete_review(review),
        Err(GraphError::UnknownReview(review))
    );
}

#[test]
fn edit_cannot_replace_keys_or_links() {
    let mut graph = RentalGraph::new();
    let owner = john_doe(&mut graph);
    let reviewer = ana_torres(&mut graph);
    let apartment = graph.insert_apartment(Apartment::default());
    let review = graph.insert_review(Review::rated(4, "Warm"));
    graph.add_apartment(owner, apartment).unwrap();
    graph.add_review_to_apartment(apartment, review).unwrap();
    graph.add_review_to_reviewer(reviewer, review).unwrap();

    graph
        .edit_owner(owner, |entry| {
            *entry = Owner::new(PersonInfo::named("Mary Major"));
        })
        .unwrap();
    graph
        .edit_review(review, |entry| *entry = Review::default())
        .unwrap();
    graph
        .edit_reviewer(reviewer, |entry| {
            *entry = Reviewer::new(PersonInfo::named("Bob"));
        })
        .unwrap();

    let entry = graph.owner(owner).unwrap();
    assert_eq!(entry.person.name.as_deref(), Some("Mary Major"));
    assert_eq!(entry.apartments(), &[apartment]);
    let entry = graph.review(review).unwrap();
    assert_eq!(entry.rating, 0);
    assert_eq!(entry.apartment(), Some(apartment));
    assert_eq!(entry.reviewer(), Some(reviewer));
    assert_eq!(graph.reviewer(reviewer).unwrap().reviews(), &[review]);
}

#[test]
fn edit_reports_unknown_keys() {
    let mut graph = RentalGraph::new();
    let apartment = graph.insert_apartment(Apartment::default());
    graph.delete_apartment(apartment).unwrap();

    assert_eq!(
        graph.edit_apartment(apartment, |entry| entry.price = Some(1)),
        Err(GraphError::UnknownApartment(apartment))
    );
}
