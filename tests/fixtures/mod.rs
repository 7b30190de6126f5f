use fake::faker::company::en::{Buzzword, CompanyName};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;

use marketplace::catalog::models::{Advertisement, Category, Product, Shop, SubCategory};
use marketplace::engagement::models::Review;
use marketplace::users::models::User;
use marketplace::Id;

#[allow(dead_code)]
pub fn fake_user() -> User {
    User {
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        phone: format!("+998{:09}", rand::random::<u32>() % 1_000_000_000),
        email: format!("user-{:08x}@example.com", rand::random::<u32>()),
        image: None,
    }
}

#[allow(dead_code)]
pub fn fake_category() -> Category {
    Category {
        name: Buzzword().fake(),
        description: Sentence(3..6).fake(),
    }
}

#[allow(dead_code)]
pub fn fake_subcategory(category_id: Id) -> SubCategory {
    SubCategory {
        category_id,
        name: Buzzword().fake(),
        description: Sentence(3..6).fake(),
    }
}

#[allow(dead_code)]
pub fn fake_shop(owner_id: Id) -> Shop {
    Shop {
        owner_id,
        company_name: CompanyName().fake(),
        brand_name: Buzzword().fake(),
        tax_id: String::new(),
        legal_certificate: String::new(),
        director_name: Name().fake(),
        contact: format!("+998{:09}", rand::random::<u32>() % 1_000_000_000),
        business_address: Sentence(2..4).fake(),
        logo: None,
        physical_branches: String::new(),
        passport_series: String::new(),
        birth_date: None,
        latitude: None,
        longitude: None,
        location: String::new(),
        registered_until: None,
    }
}

#[allow(dead_code)]
pub fn fake_product(shop_id: Id, category_id: Option<Id>, subcategory_id: Option<Id>) -> Product {
    Product {
        shop_id,
        category_id,
        subcategory_id,
        name: Name().fake(),
        description: Sentence(4..8).fake(),
        image: None,
        price: (100.0f64..1000.0f64).fake(),
        discount_price: None,
        has_discount: false,
    }
}

#[allow(dead_code)]
pub fn fake_discounted_product(shop_id: Id, category_id: Option<Id>) -> Product {
    Product {
        discount_price: Some(80.0),
        has_discount: true,
        price: 100.0,
        ..fake_product(shop_id, category_id, None)
    }
}

#[allow(dead_code)]
pub fn fake_review(product_id: Id, rating: i64) -> Review {
    Review {
        product_id,
        rating,
        body: Sentence(3..6).fake(),
    }
}

#[allow(dead_code)]
pub fn fake_advertisement(product_id: Id) -> Advertisement {
    Advertisement {
        product_id,
        description: Sentence(3..6).fake(),
        image: None,
    }
}
