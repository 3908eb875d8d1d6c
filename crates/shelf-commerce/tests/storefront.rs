//! Storefront behaviour tests.
//!
//! Property tests cover the cart totals, the browse pipeline and the
//! category rules for arbitrary inputs; the scenarios pin the seed catalog
//! behaviour end to end.

use proptest::prelude::*;

use shelf_commerce::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn make_book(index: usize, price: i64, used: bool, title: &str) -> Book {
    Book {
        id: BookId::new(format!("b{index}")),
        title: title.to_string(),
        author: format!("Author {}", index % 3),
        category: ["Kids", "Fiction", "Mystery"][index % 3].to_string(),
        price: Price::new(price),
        old_price: Price::new(price + 100),
        image: String::new(),
        condition: if used { Condition::Old } else { Condition::New },
        description: None,
    }
}

fn books_strategy() -> impl Strategy<Value = Vec<Book>> {
    prop::collection::vec((0i64..2_000, any::<bool>(), "[a-zA-Z ]{0,12}"), 0..30).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (price, used, title))| make_book(i, price, used, &title))
                .collect()
        },
    )
}

#[derive(Debug, Clone)]
enum CartOp {
    Add(usize),
    Remove(usize),
    SetQuantity(usize, i64),
    Clear,
}

fn cart_op_strategy() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        4 => (0usize..10).prop_map(CartOp::Add),
        1 => (0usize..10).prop_map(CartOp::Remove),
        2 => ((0usize..10), -3i64..20).prop_map(|(i, q)| CartOp::SetQuantity(i, q)),
        1 => Just(CartOp::Clear),
    ]
}

fn seed(id: &str) -> Book {
    seed_books()
        .into_iter()
        .find(|b| b.id.as_str() == id)
        .unwrap()
}

// ============================================================================
// Cart properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Totals always match the lines, and ids stay unique.
    #[test]
    fn prop_cart_totals_match_lines(ops in prop::collection::vec(cart_op_strategy(), 0..40)) {
        let books = seed_books();
        let mut cart = CartStore::open(Cache::open_memory(), DEFAULT_PROFILE);
        for op in ops {
            match op {
                CartOp::Add(i) => cart.add(&books[i]),
                CartOp::Remove(i) => cart.remove(&books[i].id),
                CartOp::SetQuantity(i, q) => cart.set_quantity(&books[i].id, q),
                CartOp::Clear => cart.clear(),
            }
        }

        let qty: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
        prop_assert_eq!(cart.total_items(), qty);

        let price: Price = cart
            .items()
            .iter()
            .map(|i| i.book.price.saturating_mul(i.quantity))
            .sum();
        prop_assert_eq!(cart.total_price(), price);

        prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));
        let mut ids: Vec<_> = cart.items().iter().map(|i| i.book.id.clone()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), cart.items().len());
    }

    /// set_quantity(id, 0) leaves the same cart as remove(id).
    #[test]
    fn prop_set_quantity_zero_is_remove(
        adds in prop::collection::vec(0usize..10, 1..15),
        target in 0usize..10,
    ) {
        let books = seed_books();
        let mut a = Cart::new();
        for i in &adds {
            a.add(&books[*i]);
        }
        let mut b = a.clone();

        a.set_quantity(&books[target].id, 0);
        b.remove(&books[target].id);
        prop_assert_eq!(a, b);
    }
}

// ============================================================================
// Browse pipeline properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Same inputs give the same output, and re-applying changes nothing.
    #[test]
    fn prop_pipeline_deterministic_and_idempotent(
        books in books_strategy(),
        search in "[a-zA-Z]{0,3}",
        sort in prop_oneof![
            Just(SortOption::PriceLow),
            Just(SortOption::PriceHigh),
            Just(SortOption::Name),
        ],
        category in prop_oneof![
            Just("All Books"),
            Just("Kids"),
            Just("New Books"),
            Just("Old Books"),
        ],
    ) {
        let query = BrowseQuery::new()
            .with_search(search)
            .with_category(category)
            .with_sort(sort);

        let first = query.apply(&books);
        let second = query.apply(&books);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(query.apply(&first), first);
    }

    /// With distinct prices, price-low reversed is price-high.
    #[test]
    fn prop_price_low_reversed_is_price_high(
        prices in prop::collection::hash_set(0i64..10_000, 0..30),
    ) {
        let books: Vec<Book> = prices
            .into_iter()
            .enumerate()
            .map(|(i, p)| make_book(i, p, i % 2 == 0, "t"))
            .collect();

        let mut low = BrowseQuery::new().with_sort(SortOption::PriceLow).apply(&books);
        let high = BrowseQuery::new().with_sort(SortOption::PriceHigh).apply(&books);
        low.reverse();
        prop_assert_eq!(low, high);
    }

    /// "New Books" is exactly the new-condition subset, in input order.
    #[test]
    fn prop_new_books_is_condition_subset(books in books_strategy()) {
        let mut filtered = BrowseQuery::new().with_category("New Books").apply(&books);
        let mut expected: Vec<Book> = books
            .iter()
            .filter(|b| b.condition == Condition::New)
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.id.cmp(&b.id));
        expected.sort_by(|a, b| a.id.cmp(&b.id));
        prop_assert_eq!(filtered, expected);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_cart_total_scenario() {
    let mut cart = CartStore::open(Cache::open_memory(), DEFAULT_PROFILE);
    cart.add(&seed("1"));
    cart.add(&seed("4"));
    cart.add(&seed("4"));

    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.total_price(), Price::new(1397));
    assert_eq!(cart.total_items(), 3);
}

#[test]
fn test_search_harry_scenario() {
    let mut ids: Vec<String> = BrowseQuery::new()
        .with_search("hArRy")
        .apply(&seed_books())
        .into_iter()
        .map(|b| b.id.into_inner())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["1".to_string(), "9".to_string()]);
}

#[test]
fn test_add_then_zero_empties_storage() {
    let cache = Cache::open_memory();
    let mut cart = CartStore::open(cache.clone(), DEFAULT_PROFILE);
    cart.add(&seed("2"));
    assert_eq!(cart.total_price(), Price::new(249));

    cart.set_quantity(&BookId::new("2"), 0);
    assert!(cart.is_empty());
    assert!(cache.keys().unwrap().is_empty());
    assert!(CartStore::open(cache, DEFAULT_PROFILE).is_empty());
}

#[tokio::test]
async fn test_checkout_end_to_end() {
    let backend = MemoryBackend::new().signed_in(User::new("reader", Some("reader@shelf.test")));
    let catalog = aggregate(&backend).await;

    let mysteries = BrowseQuery::new()
        .with_category("mystery")
        .apply(catalog.entries());
    assert_eq!(mysteries.len(), 2);

    let mut cart = CartStore::open(Cache::open_memory(), DEFAULT_PROFILE);
    for entry in &mysteries {
        cart.add(&entry.book);
    }

    let payment = PaymentDetails::CashOnDelivery {
        address: "221B Baker Street".to_string(),
        phone: "9000000000".to_string(),
    };
    let order = place_order(&mut cart, &backend, &payment).await.unwrap();
    assert_eq!(order.total_price, Price::new(349 + 499));
    assert!(cart.is_empty());

    let history = my_orders(&backend).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].payment_method, PaymentMethod::Cod);
}

#[tokio::test]
async fn test_listing_joins_catalog_and_sections() {
    let backend = MemoryBackend::new().signed_in(User::new("seller", None));
    let form = ListingForm {
        title: "Harry Potter and the Goblet of Fire".to_string(),
        author: "J.K. Rowling".to_string(),
        category: "Kids".to_string(),
        condition: "old".to_string(),
        price: "120".to_string(),
        contact: "seller@shelf.test".to_string(),
        ..Default::default()
    };
    shelf_commerce::catalog::submit_listing(&backend, &form)
        .await
        .unwrap();

    let catalog = aggregate(&backend).await;
    assert_eq!(catalog.len(), 11);
    assert_eq!(catalog.entries()[10].origin, Origin::Listing);

    let sections = visible_sections(catalog.entries(), &SectionRules::default());
    let newly = sections
        .iter()
        .find(|s| s.kind == SectionKind::NewlyAdded)
        .unwrap();
    assert_eq!(newly.entries.len(), 1);
    let budget = sections
        .iter()
        .find(|s| s.kind == SectionKind::BudgetPicks)
        .unwrap();
    assert_eq!(budget.entries[0].book.price, Price::new(120));
}
