//! Built-in seed catalog.

use crate::catalog::{Book, Condition};
use crate::ids::BookId;
use crate::price::Price;

type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    i64,
    Condition,
    &'static str,
    &'static str,
);

const SEED: [SeedRow; 10] = [
    (
        "1",
        "Harry Potter and the Philosopher's Stone",
        "J.K. Rowling",
        "Kids",
        399,
        599,
        Condition::New,
        "/assets/books/harry-potter-stone.png",
        "The magical journey begins at Hogwarts School of Witchcraft and Wizardry.",
    ),
    (
        "2",
        "Toy Story Adventures",
        "Disney Pixar",
        "Kids",
        249,
        349,
        Condition::New,
        "/assets/books/toy-story.jpg",
        "Join Woody and Buzz on their exciting adventures!",
    ),
    (
        "3",
        "Cars: Lightning McQueen's Story",
        "Disney Pixar",
        "Kids",
        299,
        449,
        Condition::New,
        "/assets/books/cars.jpg",
        "Race through Radiator Springs with Lightning McQueen.",
    ),
    (
        "4",
        "Mystery Thriller",
        "Agatha Christie",
        "Mystery",
        499,
        699,
        Condition::New,
        "/assets/books/mystery.jpg",
        "An intriguing mystery that will keep you guessing until the end.",
    ),
    (
        "5",
        "The Romance Collection",
        "Nicholas Sparks",
        "Romance",
        449,
        599,
        Condition::New,
        "/assets/books/romance.jpg",
        "A heartwarming tale of love and passion.",
    ),
    (
        "6",
        "Literary Fiction Bestseller",
        "Margaret Atwood",
        "Fiction",
        549,
        749,
        Condition::New,
        "/assets/books/fiction.jpg",
        "Award-winning contemporary fiction.",
    ),
    (
        "7",
        "Advanced Mathematics",
        "Robert Smith",
        "Study",
        799,
        999,
        Condition::New,
        "/assets/books/study.jpg",
        "Comprehensive guide for students and professionals.",
    ),
    (
        "8",
        "The Haunted House",
        "Stephen King",
        "Horror",
        499,
        649,
        Condition::New,
        "/assets/books/horror.jpg",
        "A spine-chilling horror story that will haunt your dreams.",
    ),
    (
        "9",
        "Harry Potter Chamber of Secrets",
        "J.K. Rowling",
        "Kids",
        299,
        599,
        Condition::Old,
        "/assets/books/harry-potter.png",
        "Used book in excellent condition.",
    ),
    (
        "10",
        "Murder on the Orient Express",
        "Agatha Christie",
        "Mystery",
        349,
        699,
        Condition::Old,
        "/assets/books/mystery.jpg",
        "Classic mystery in good condition.",
    ),
];

/// The ten books that ship with the storefront.
pub fn seed_books() -> Vec<Book> {
    SEED.iter()
        .map(
            |&(id, title, author, category, price, old_price, condition, image, description)| Book {
                id: BookId::new(id),
                title: title.to_string(),
                author: author.to_string(),
                category: category.to_string(),
                price: Price::new(price),
                old_price: Price::new(old_price),
                image: image.to_string(),
                condition,
                description: Some(description.to_string()),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_unique_ids() {
        let books = seed_books();
        assert_eq!(books.len(), 10);
        let mut ids: Vec<_> = books.iter().map(|b| b.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_seed_used_books() {
        let used: Vec<_> = seed_books()
            .into_iter()
            .filter(|b| b.is_used())
            .map(|b| b.id.into_inner())
            .collect();
        assert_eq!(used, vec!["9".to_string(), "10".to_string()]);
    }
}
