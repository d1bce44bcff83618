//! Static text shown on the Introduction and Conclusions pages.

pub const APP_TITLE: &str = "Cars Analytics Dashboard";

pub const INTRODUCTION: &str = "\
Used automobiles are in high demand in the Indian market right now. The \
pre-owned car market has grown over the years and is currently larger than \
the new car market, notwithstanding the recent slowdown in sales of new cars. \
Approximately 4 million used cars were bought and sold in 2018-19, compared \
to 3.6 million new cars. Sales of new cars are slowing down, which may \
indicate that demand is moving toward the used car market. Rather than \
purchasing new vehicles, many sellers swap their old vehicles for used ones.";

/// Frequently asked questions and their answers.
pub const FAQ: &[(&str, &str)] = &[
    (
        "Do the various predicting factors affect the price of a used car?",
        "Yes. Year, kilometers driven, brand, fuel type, transmission, engine, \
         mileage and power collectively influence used car pricing.",
    ),
    (
        "Which independent variables affect the pricing of used cars?",
        "Year, kilometers driven, brand, fuel type, transmission, engine \
         capacity, mileage, power, seating capacity and location.",
    ),
    (
        "Does the name of a car have any effect on pricing?",
        "Yes. Brand and model name significantly impact pricing through trust, \
         maintenance cost and market reputation.",
    ),
    (
        "How does the type of transmission affect pricing?",
        "Automatic cars usually command higher prices due to higher demand and \
         driving convenience.",
    ),
    (
        "Does the location in which the car is sold affect the price?",
        "Yes. Regional demand, income levels and usage patterns all shift prices.",
    ),
    (
        "Do Kilometers_Driven and Year of manufacture correlate with price?",
        "Kilometers driven correlates negatively with price, while the year of \
         manufacture correlates positively.",
    ),
    (
        "Do Mileage, Engine and Power affect the pricing of the car?",
        "Yes. Engine capacity and power raise the price, while mileage shapes \
         buyer preference and value.",
    ),
    (
        "How do the number of seats and fuel type affect pricing?",
        "More seats add utility and price, while diesel cars currently see \
         higher demand due to fuel efficiency.",
    ),
];

/// A titled block of bullet points.
pub struct Section {
    pub title: &'static str,
    pub points: &'static [&'static str],
}

pub const FINDINGS: &[Section] = &[
    Section {
        title: "Summary of Findings",
        points: &[
            "Car price is strongly influenced by model year: newer cars tend to cost more.",
            "Kilometers driven has a negative impact on price, indicating depreciation with usage.",
            "Fuel type and transmission significantly affect pricing patterns.",
            "Certain brands consistently command higher resale value.",
        ],
    },
    Section {
        title: "Market Observations",
        points: &[
            "The used car market in India is growing rapidly and surpassing new car sales.",
            "Buyers prefer lower mileage and newer models.",
            "Petrol and diesel vehicles dominate the resale market.",
        ],
    },
    Section {
        title: "Business Implications",
        points: &[
            "Dealers can optimize pricing using historical trends.",
            "Buyers can identify value-for-money vehicles.",
            "Sellers can time resale for maximum return.",
        ],
    },
];

pub const RECOMMENDATIONS: &[Section] = &[
    Section {
        title: "Key Observations",
        points: &[
            "Wear and tear sets how much work a car needs before sale, which drives profitability.",
            "Cars with an accident history lose value through safety concerns and refurbishment cost.",
            "Comfort and safety features such as AC, moonroof and airbags raise prices.",
            "Very old models depreciate heavily, reducing both demand and resale value.",
        ],
    },
    Section {
        title: "Brand & Market Trends",
        points: &[
            "Maruti, Hyundai and Honda dominate the low-budget segment through affordability and reliability.",
            "Mumbai and Hyderabad show higher used car activity; validate with more regions.",
        ],
    },
    Section {
        title: "Future Data Strategy",
        points: &[
            "Segment by location and car type to build market-specific models.",
            "Prioritize automatic cars, which command higher resale prices.",
            "With rising petrol prices, diesel cars offer better resale opportunities.",
        ],
    },
    Section {
        title: "Business Recommendations",
        points: &[
            "Half-day test drive schemes build customer confidence and conversion.",
            "Annual maintenance packages with a small upfront fee build long-term relationships.",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_has_eight_answered_questions() {
        assert_eq!(FAQ.len(), 8);
        assert!(FAQ.iter().all(|(q, a)| q.ends_with('?') && !a.is_empty()));
    }
}
