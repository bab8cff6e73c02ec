//! Built-in recipe catalog matched against pantry stock.

use crate::recipes::{DietTag, Recipe};

pub const RECIPE_CATALOG: &[Recipe] = &[
    Recipe {
        id: "recipe-1",
        name: "Paneer & Veggie Stir Fry",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 420,
        protein_g: 23,
        ingredients: &["Paneer", "Bell Pepper", "Onion", "Olive Oil", "Garlic"],
    },
    Recipe {
        id: "recipe-2",
        name: "Chicken Rice Bowl",
        diet: &[DietTag::HighProtein, DietTag::GlutenFree],
        calories: 510,
        protein_g: 34,
        ingredients: &["Chicken Breast", "Rice", "Spinach", "Tomato", "Olive Oil"],
    },
    Recipe {
        id: "recipe-3",
        name: "Masala Oats Bowl",
        diet: &[DietTag::Vegetarian],
        calories: 330,
        protein_g: 12,
        ingredients: &["Oats", "Tomato", "Onion", "Peas", "Spices"],
    },
    Recipe {
        id: "recipe-4",
        name: "Egg Bhurji Wrap",
        diet: &[DietTag::HighProtein],
        calories: 390,
        protein_g: 21,
        ingredients: &["Eggs", "Onion", "Tomato", "Whole Wheat Bread", "Butter"],
    },
    Recipe {
        id: "recipe-5",
        name: "Greek Yogurt Fruit Bowl",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 280,
        protein_g: 14,
        ingredients: &["Greek Yogurt", "Apple", "Banana", "Honey"],
    },
    Recipe {
        id: "recipe-6",
        name: "Dal Tadka",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 310,
        protein_g: 15,
        ingredients: &["Toor Dal", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-7",
        name: "Chana Masala",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree],
        calories: 360,
        protein_g: 16,
        ingredients: &["Chickpeas", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-8",
        name: "Rajma Curry",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree],
        calories: 390,
        protein_g: 15,
        ingredients: &["Rajma", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-9",
        name: "Aloo Gobi",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 280,
        protein_g: 7,
        ingredients: &["Potato", "Cauliflower", "Onion", "Tomato", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-10",
        name: "Bhindi Masala",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 240,
        protein_g: 6,
        ingredients: &["Bhindi", "Onion", "Tomato", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-11",
        name: "Baingan Bharta",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 230,
        protein_g: 6,
        ingredients: &["Brinjal", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-12",
        name: "Palak Paneer",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 410,
        protein_g: 19,
        ingredients: &["Paneer", "Spinach", "Onion", "Tomato", "Garlic", "Spices"],
    },
    Recipe {
        id: "recipe-13",
        name: "Paneer Butter Masala",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree],
        calories: 470,
        protein_g: 18,
        ingredients: &["Paneer", "Tomato", "Onion", "Butter", "Cream", "Spices"],
    },
    Recipe {
        id: "recipe-14",
        name: "Matar Paneer",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree],
        calories: 420,
        protein_g: 17,
        ingredients: &["Paneer", "Peas", "Onion", "Tomato", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-15",
        name: "Egg Curry",
        diet: &[DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 360,
        protein_g: 22,
        ingredients: &["Eggs", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-16",
        name: "Chicken Curry",
        diet: &[DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 460,
        protein_g: 30,
        ingredients: &["Chicken", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-17",
        name: "Chicken Tikka",
        diet: &[DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 390,
        protein_g: 35,
        ingredients: &["Chicken", "Yogurt", "Garlic", "Ginger", "Spices", "Lemon"],
    },
    Recipe {
        id: "recipe-18",
        name: "Fish Curry",
        diet: &[DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 370,
        protein_g: 29,
        ingredients: &["Fish", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-19",
        name: "Vegetable Pulao",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 430,
        protein_g: 10,
        ingredients: &["Rice", "Carrot", "Peas", "Beans", "Onion", "Spices"],
    },
    Recipe {
        id: "recipe-20",
        name: "Jeera Rice",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 320,
        protein_g: 6,
        ingredients: &["Rice", "Jeera", "Ghee", "Salt"],
    },
    Recipe {
        id: "recipe-21",
        name: "Poha",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 290,
        protein_g: 7,
        ingredients: &["Poha", "Onion", "Potato", "Peanuts", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-22",
        name: "Upma",
        diet: &[DietTag::Vegetarian],
        calories: 310,
        protein_g: 8,
        ingredients: &["Suji", "Onion", "Carrot", "Peas", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-23",
        name: "Idli",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 250,
        protein_g: 8,
        ingredients: &["Idli Batter", "Oil", "Salt"],
    },
    Recipe {
        id: "recipe-24",
        name: "Dosa",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 320,
        protein_g: 9,
        ingredients: &["Dosa Batter", "Oil", "Potato", "Onion", "Spices"],
    },
    Recipe {
        id: "recipe-25",
        name: "Sambar",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 270,
        protein_g: 11,
        ingredients: &["Toor Dal", "Tamarind", "Onion", "Tomato", "Vegetables", "Spices"],
    },
    Recipe {
        id: "recipe-26",
        name: "Lemon Rice",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 330,
        protein_g: 7,
        ingredients: &["Rice", "Lemon", "Peanuts", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-27",
        name: "Curd Rice",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 300,
        protein_g: 9,
        ingredients: &["Rice", "Curd", "Mustard Seeds", "Curry Leaves", "Salt"],
    },
    Recipe {
        id: "recipe-28",
        name: "Kadhi Pakora",
        diet: &[DietTag::Vegetarian],
        calories: 410,
        protein_g: 12,
        ingredients: &["Curd", "Besan", "Onion", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-29",
        name: "Besan Chilla",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 280,
        protein_g: 14,
        ingredients: &["Besan", "Onion", "Tomato", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-30",
        name: "Moong Dal Chilla",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 260,
        protein_g: 15,
        ingredients: &["Moong Dal", "Onion", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-31",
        name: "Khichdi",
        diet: &[DietTag::Vegetarian, DietTag::GlutenFree],
        calories: 340,
        protein_g: 11,
        ingredients: &["Rice", "Moong Dal", "Ghee", "Jeera", "Spices"],
    },
    Recipe {
        id: "recipe-32",
        name: "Veg Hakka Noodles",
        diet: &[DietTag::Vegetarian],
        calories: 450,
        protein_g: 10,
        ingredients: &["Noodles", "Carrot", "Cabbage", "Capsicum", "Soy Sauce", "Oil"],
    },
    Recipe {
        id: "recipe-33",
        name: "Soya Chunk Curry",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein],
        calories: 350,
        protein_g: 22,
        ingredients: &["Soya Chunks", "Onion", "Tomato", "Garlic", "Spices", "Oil"],
    },
    Recipe {
        id: "recipe-34",
        name: "Aloo Paratha",
        diet: &[DietTag::Vegetarian],
        calories: 430,
        protein_g: 10,
        ingredients: &["Wheat Flour", "Potato", "Onion", "Spices", "Ghee"],
    },
    Recipe {
        id: "recipe-35",
        name: "Paneer Bhurji",
        diet: &[DietTag::Vegetarian, DietTag::HighProtein, DietTag::GlutenFree, DietTag::LowCarb],
        calories: 360,
        protein_g: 20,
        ingredients: &["Paneer", "Onion", "Tomato", "Spices", "Oil"],
    },
];
