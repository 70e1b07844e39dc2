//! Hotel money, rent rate and the review history that drives the rating.

use std::collections::VecDeque;

use sinking_hotel_core::{EconomyConfig, EconomySnapshot, Event};

/// Money, rating and pricing state of the hotel.
#[derive(Debug)]
pub(crate) struct HotelEconomy {
    money: f32,
    rating: f32,
    reviews: VecDeque<u32>,
    review_capacity: usize,
    max_rating: u32,
    rent_per_second: f32,
    floor_purchase_price: f32,
    floor_label: String,
}

impl HotelEconomy {
    pub(crate) fn new(config: &EconomyConfig) -> Self {
        let review_capacity = config.review_capacity.max(1);
        Self {
            money: config.starting_money.max(0.0),
            rating: 0.0,
            reviews: VecDeque::with_capacity(review_capacity + 1),
            review_capacity,
            max_rating: config.max_rating.max(1),
            rent_per_second: config.rent_per_second.max(0.0),
            floor_purchase_price: config.floor_purchase_price.max(0.0),
            floor_label: config.floor_label.clone(),
        }
    }

    pub(crate) fn money(&self) -> f32 {
        self.money
    }

    #[cfg(test)]
    pub(crate) fn rating(&self) -> f32 {
        self.rating
    }

    pub(crate) fn max_rating(&self) -> u32 {
        self.max_rating
    }

    pub(crate) fn rent_per_second(&self) -> f32 {
        self.rent_per_second
    }

    pub(crate) fn floor_purchase_price(&self) -> f32 {
        self.floor_purchase_price
    }

    pub(crate) fn floor_label(&self) -> &str {
        &self.floor_label
    }

    pub(crate) fn reviews(&self) -> impl Iterator<Item = u32> + '_ {
        self.reviews.iter().copied()
    }

    /// Adds rent or other income to the balance.
    pub(crate) fn deposit(&mut self, amount: f32, out: &mut Vec<Event>) {
        if amount <= 0.0 {
            return;
        }
        self.set_money(self.money + amount, out);
    }

    /// Deducts `amount` when affordable; leaves the balance untouched otherwise.
    pub(crate) fn try_spend(&mut self, amount: f32, out: &mut Vec<Event>) -> bool {
        if amount < 0.0 || self.money < amount {
            return false;
        }
        self.set_money(self.money - amount, out);
        true
    }

    /// Records a review, evicting the oldest beyond capacity, and re-derives the rating.
    pub(crate) fn post_review(&mut self, score: u32, out: &mut Vec<Event>) -> u32 {
        let score = score.clamp(1, self.max_rating);
        self.reviews.push_back(score);
        while self.reviews.len() > self.review_capacity {
            let _ = self.reviews.pop_front();
        }

        let total: u32 = self.reviews.iter().sum();
        let mean = total as f32 / self.reviews.len() as f32;
        self.set_rating(mean, out);
        score
    }

    pub(crate) fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            money: self.money,
            rating: self.rating,
            max_rating: self.max_rating,
            review_count: self.reviews.len(),
        }
    }

    fn set_money(&mut self, value: f32, out: &mut Vec<Event>) {
        self.money = value.max(0.0);
        out.push(Event::MoneyChanged);
    }

    fn set_rating(&mut self, value: f32, out: &mut Vec<Event>) {
        self.rating = value.clamp(0.0, self.max_rating as f32);
        out.push(Event::RatingChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economy_with(review_capacity: usize) -> HotelEconomy {
        HotelEconomy::new(&EconomyConfig {
            starting_money: 100.0,
            review_capacity,
            ..EconomyConfig::default()
        })
    }

    #[test]
    fn spending_more_than_balance_is_refused() {
        let mut economy = economy_with(10);
        let mut events = Vec::new();

        assert!(!economy.try_spend(150.0, &mut events));
        assert!(events.is_empty());
        assert!((economy.money() - 100.0).abs() < f32::EPSILON);

        assert!(economy.try_spend(40.0, &mut events));
        assert_eq!(events, vec![Event::MoneyChanged]);
        assert!((economy.money() - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn deposit_notifies_listeners() {
        let mut economy = economy_with(10);
        let mut events = Vec::new();
        economy.deposit(2.5, &mut events);
        economy.deposit(0.0, &mut events);
        assert_eq!(events, vec![Event::MoneyChanged]);
        assert!((economy.money() - 102.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rating_is_mean_of_bounded_history() {
        let mut economy = economy_with(3);
        let mut events = Vec::new();

        for score in [5, 1, 3, 4] {
            let _ = economy.post_review(score, &mut events);
        }

        assert_eq!(economy.reviews().collect::<Vec<_>>(), vec![1, 3, 4]);
        assert!((economy.rating() - 8.0 / 3.0).abs() < 1e-6);
        assert_eq!(
            events
                .iter()
                .filter(|event| **event == Event::RatingChanged)
                .count(),
            4
        );
    }

    #[test]
    fn review_scores_are_clamped() {
        let mut economy = economy_with(10);
        let mut events = Vec::new();
        assert_eq!(economy.post_review(0, &mut events), 1);
        assert_eq!(economy.post_review(99, &mut events), economy.max_rating());
        assert!(economy.rating() <= economy.max_rating() as f32);
    }

    #[test]
    fn snapshot_reports_rating_fraction() {
        let mut economy = economy_with(10);
        let mut events = Vec::new();
        let _ = economy.post_review(4, &mut events);
        let snapshot = economy.snapshot();
        assert_eq!(snapshot.review_count, 1);
        assert!((snapshot.rating_fraction() - 0.8).abs() < 1e-6);
    }
}
