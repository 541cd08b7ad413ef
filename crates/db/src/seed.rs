//! Demo data: three accounts (one per role) and the sample restaurant catalogue.

use chrono::{TimeZone, Utc};
use tablebook_core::restaurant::{Address, PriceTier, Restaurant, Table, WeeklyHours};
use tablebook_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_RESTAURANT};
use tablebook_core::types::DbId;

use crate::models::user::CreateUser;
use crate::repositories::{RestaurantRepo, UserRepo};
use crate::{DbError, DbPool};

pub const DEMO_CUSTOMER_EMAIL: &str = "customer@tablebook.dev";
pub const DEMO_MANAGER_EMAIL: &str = "manager@tablebook.dev";
pub const DEMO_ADMIN_EMAIL: &str = "admin@tablebook.dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub restaurants: usize,
}

struct Listing {
    name: &'static str,
    description: &'static str,
    cuisine: &'static str,
    price: PriceTier,
    rating: f64,
    review_count: u32,
    street: &'static str,
    city: &'static str,
    zip: &'static str,
    /// Monday through Sunday.
    hours: [&'static str; 7],
    photos: &'static [&'static str],
    bookings_today: u32,
    phone: &'static str,
    website: &'static str,
    features: &'static [&'static str],
    approved: bool,
}

const PHOTO: &str = "https://images.pexels.com/photos/";

fn catalogue() -> Vec<Listing> {
    vec![
        Listing {
            name: "Bella Italia",
            description: "Experience authentic Italian cuisine in a charming rustic setting. Our menu features handmade pasta, wood-fired pizzas, and a carefully curated wine list.",
            cuisine: "Italian",
            price: PriceTier::Upscale,
            rating: 4.7,
            review_count: 324,
            street: "123 Main St",
            city: "San Francisco",
            zip: "94105",
            hours: [
                "11:00 AM - 10:00 PM",
                "11:00 AM - 10:00 PM",
                "11:00 AM - 10:00 PM",
                "11:00 AM - 11:00 PM",
                "11:00 AM - 11:00 PM",
                "10:00 AM - 11:00 PM",
                "10:00 AM - 9:00 PM",
            ],
            photos: &["262978/pexels-photo-262978.jpeg", "3535383/pexels-photo-3535383.jpeg"],
            bookings_today: 42,
            phone: "(415) 555-1234",
            website: "https://example.com/bellaitalia",
            features: &["Outdoor Seating", "Full Bar", "Private Dining", "Wheelchair Accessible"],
            approved: true,
        },
        Listing {
            name: "Sakura Sushi",
            description: "Fresh, innovative sushi and Japanese dishes in a modern atmosphere. Our sushi chefs have trained in Japan and provide an authentic experience.",
            cuisine: "Japanese",
            price: PriceTier::Moderate,
            rating: 4.9,
            review_count: 268,
            street: "456 Market St",
            city: "San Francisco",
            zip: "94102",
            hours: [
                "Closed",
                "12:00 PM - 10:00 PM",
                "12:00 PM - 10:00 PM",
                "12:00 PM - 10:00 PM",
                "12:00 PM - 11:00 PM",
                "12:00 PM - 11:00 PM",
                "12:00 PM - 9:00 PM",
            ],
            photos: &["941861/pexels-photo-941861.jpeg", "2098143/pexels-photo-2098143.jpeg"],
            bookings_today: 36,
            phone: "(415) 555-5678",
            website: "https://example.com/sakurasushi",
            features: &["Takeout", "Delivery", "Vegetarian Options", "Gluten-Free Options"],
            approved: true,
        },
        Listing {
            name: "Harvest Table",
            description: "Farm-to-table cuisine featuring seasonal ingredients and craft cocktails.",
            cuisine: "American",
            price: PriceTier::Moderate,
            rating: 4.5,
            review_count: 193,
            street: "789 Oak St",
            city: "Oakland",
            zip: "94607",
            hours: [
                "5:00 PM - 10:00 PM",
                "5:00 PM - 10:00 PM",
                "5:00 PM - 10:00 PM",
                "5:00 PM - 10:00 PM",
                "5:00 PM - 11:00 PM",
                "10:00 AM - 11:00 PM",
                "10:00 AM - 3:00 PM",
            ],
            photos: &["1307698/pexels-photo-1307698.jpeg", "696218/pexels-photo-696218.jpeg"],
            bookings_today: 28,
            phone: "(510) 555-9012",
            website: "https://example.com/harvesttable",
            features: &["Organic", "Locally Sourced", "Full Bar", "Sunday Brunch"],
            approved: true,
        },
        Listing {
            name: "Spice Route",
            description: "Authentic Indian cuisine featuring regional specialties and traditional tandoor cooking.",
            cuisine: "Indian",
            price: PriceTier::Moderate,
            rating: 4.6,
            review_count: 156,
            street: "101 Valencia St",
            city: "San Francisco",
            zip: "94103",
            hours: [
                "11:30 AM - 10:00 PM",
                "11:30 AM - 10:00 PM",
                "11:30 AM - 10:00 PM",
                "11:30 AM - 10:00 PM",
                "11:30 AM - 10:30 PM",
                "11:30 AM - 10:30 PM",
                "11:30 AM - 9:30 PM",
            ],
            photos: &["2474661/pexels-photo-2474661.jpeg", "1117452/pexels-photo-1117452.jpeg"],
            bookings_today: 22,
            phone: "(415) 555-3456",
            website: "https://example.com/spiceroute",
            features: &["Vegetarian Options", "Vegan Options", "Delivery", "Catering"],
            approved: true,
        },
        Listing {
            name: "Le Bistro",
            description: "Classic French cuisine in an elegant setting.",
            cuisine: "French",
            price: PriceTier::Luxury,
            rating: 4.8,
            review_count: 278,
            street: "222 Pine St",
            city: "San Francisco",
            zip: "94111",
            hours: [
                "Closed",
                "5:30 PM - 10:00 PM",
                "5:30 PM - 10:00 PM",
                "5:30 PM - 10:00 PM",
                "5:30 PM - 11:00 PM",
                "5:00 PM - 11:00 PM",
                "5:00 PM - 9:00 PM",
            ],
            photos: &["67468/pexels-photo-67468.jpeg", "1579739/pexels-photo-1579739.jpeg"],
            bookings_today: 34,
            phone: "(415) 555-7890",
            website: "https://example.com/lebistro",
            features: &["Wine Pairing", "Private Dining", "Sommelier", "Tasting Menu"],
            approved: true,
        },
        Listing {
            name: "El Toro Taqueria",
            description: "Authentic Mexican street food and craft margaritas in a vibrant, casual atmosphere.",
            cuisine: "Mexican",
            price: PriceTier::Budget,
            rating: 4.4,
            review_count: 312,
            street: "333 Mission St",
            city: "San Francisco",
            zip: "94105",
            hours: [
                "11:00 AM - 10:00 PM",
                "11:00 AM - 10:00 PM",
                "11:00 AM - 10:00 PM",
                "11:00 AM - 11:00 PM",
                "11:00 AM - 1:00 AM",
                "11:00 AM - 1:00 AM",
                "11:00 AM - 9:00 PM",
            ],
            photos: &["2087748/pexels-photo-2087748.jpeg", "4958641/pexels-photo-4958641.jpeg"],
            bookings_today: 18,
            phone: "(415) 555-2345",
            website: "https://example.com/eltoro",
            features: &["Happy Hour", "Outdoor Seating", "Full Bar", "Late Night"],
            approved: true,
        },
        Listing {
            name: "Urban Grill",
            description: "Wood-fired steaks and seasonal sides.",
            cuisine: "American",
            price: PriceTier::Upscale,
            rating: 0.0,
            review_count: 0,
            street: "48 Folsom St",
            city: "San Francisco",
            zip: "94107",
            hours: ["5:00 PM - 10:00 PM"; 7],
            photos: &[],
            bookings_today: 0,
            phone: "(415) 555-0101",
            website: "https://example.com/urbangrill",
            features: &["Full Bar"],
            approved: false,
        },
    ]
}

/// Default floor plan: four two-tops, four four-tops, two six-tops, one eight-top.
fn floor_plan() -> Vec<Table> {
    let sizes = [2, 2, 2, 2, 4, 4, 4, 4, 6, 6, 8];
    sizes
        .iter()
        .enumerate()
        .map(|(i, &capacity)| Table {
            id: 0,
            name: format!("Table {}", i + 1),
            capacity,
            is_available: true,
        })
        .collect()
}

fn into_restaurant(listing: Listing, manager_id: Option<DbId>) -> Restaurant {
    let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] =
        listing.hours.map(str::to_string);
    Restaurant {
        id: 0,
        name: listing.name.into(),
        description: listing.description.into(),
        cuisine: listing.cuisine.into(),
        price_range: listing.price,
        rating: listing.rating,
        review_count: listing.review_count,
        address: Address {
            street: listing.street.into(),
            city: listing.city.into(),
            state: "CA".into(),
            zip_code: listing.zip.into(),
            country: "USA".into(),
        },
        hours: WeeklyHours {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        },
        photos: listing
            .photos
            .iter()
            .map(|p| format!("{PHOTO}{p}?auto=compress&cs=tinysrgb&h=750&w=1260"))
            .collect(),
        bookings_today: listing.bookings_today,
        phone_number: listing.phone.into(),
        website: listing.website.into(),
        features: listing.features.iter().map(|f| f.to_string()).collect(),
        tables: floor_plan(),
        manager_id,
        approved: listing.approved,
        active: true,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_else(Utc::now),
    }
}

/// Load the demo accounts and catalogue into an empty store.
///
/// All three accounts share `password_hash`. Restaurants receive ids in
/// catalogue order, so Bella Italia is always id 1.
pub async fn seed_demo_data(pool: &DbPool, password_hash: &str) -> Result<SeedSummary, DbError> {
    let accounts = [
        ("Casey Customer", DEMO_CUSTOMER_EMAIL, ROLE_CUSTOMER),
        ("Morgan Manager", DEMO_MANAGER_EMAIL, ROLE_RESTAURANT),
        ("Avery Admin", DEMO_ADMIN_EMAIL, ROLE_ADMIN),
    ];
    let mut manager_id = None;
    for (name, email, role) in accounts {
        let user = UserRepo::create(
            pool,
            &CreateUser {
                name: name.into(),
                email: email.into(),
                password_hash: password_hash.into(),
                role: role.into(),
            },
        )
        .await?;
        if role == ROLE_RESTAURANT {
            manager_id = Some(user.id);
        }
    }

    let listings = catalogue();
    let count = listings.len();
    for listing in listings {
        let restaurant = into_restaurant(listing, manager_id);
        RestaurantRepo::insert(pool, restaurant).await?;
    }

    tracing::info!(users = accounts.len(), restaurants = count, "Seeded demo data");
    Ok(SeedSummary {
        users: accounts.len(),
        restaurants: count,
    })
}
