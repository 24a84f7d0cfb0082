//! Labeled training corpus
//!
//! The built-in corpus is a balanced set of short, everyday expense
//! descriptions across all six categories. Custom corpora can be loaded from
//! CSV files with `description,category` columns.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Category;

/// A labeled description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub description: String,
    pub category: Category,
}

impl TrainingExample {
    pub fn new(description: impl Into<String>, category: Category) -> Self {
        Self {
            description: description.into(),
            category,
        }
    }
}

const BUILTIN_EXAMPLES: &[(&str, Category)] = &[
    // Food
    ("lunch at restaurant", Category::Food),
    ("breakfast coffee", Category::Food),
    ("mcdonalds burger", Category::Food),
    ("pizza delivery", Category::Food),
    ("grocery shopping", Category::Food),
    ("vegetables and fruits", Category::Food),
    ("milk eggs bread", Category::Food),
    ("dinner at hotel", Category::Food),
    ("swiggy order", Category::Food),
    ("zomato delivery", Category::Food),
    ("chai and snacks", Category::Food),
    ("biryani from restaurant", Category::Food),
    ("ice cream parlour", Category::Food),
    ("bakery items", Category::Food),
    ("food court meal", Category::Food),
    ("canteen food", Category::Food),
    ("cafe coffee", Category::Food),
    ("street food", Category::Food),
    ("dining out", Category::Food),
    ("takeaway food", Category::Food),
    ("supermarket groceries", Category::Food),
    ("weekly grocery run", Category::Food),
    ("dosa idli breakfast", Category::Food),
    ("dominos pizza", Category::Food),
    ("kfc chicken bucket", Category::Food),
    ("subway sandwich", Category::Food),
    ("restaurant bill", Category::Food),
    ("juice shop", Category::Food),
    ("coke pepsi drink", Category::Food),
    ("chocolate candy", Category::Food),
    ("bought lunch", Category::Food),
    ("ordered food online", Category::Food),
    ("meat fish chicken", Category::Food),
    ("rice dal sabzi", Category::Food),
    ("paneer curry", Category::Food),
    ("noodles pasta", Category::Food),
    ("burger fries", Category::Food),
    ("salad bowl", Category::Food),
    ("smoothie protein shake", Category::Food),
    ("evening snack", Category::Food),
    ("hotel breakfast buffet", Category::Food),
    ("tiffin box", Category::Food),
    ("samosa chaat", Category::Food),
    ("pav bhaji", Category::Food),
    ("dhaba meal", Category::Food),
    ("fruit purchase", Category::Food),
    ("vegetable market", Category::Food),
    ("meat shop", Category::Food),
    ("bakery cake", Category::Food),
    ("coffee shop", Category::Food),

    // Transport
    ("uber ride", Category::Transport),
    ("ola cab", Category::Transport),
    ("petrol filling", Category::Transport),
    ("diesel fuel", Category::Transport),
    ("auto rickshaw fare", Category::Transport),
    ("metro card recharge", Category::Transport),
    ("bus ticket", Category::Transport),
    ("train ticket booking", Category::Transport),
    ("flight ticket", Category::Transport),
    ("rapido bike taxi", Category::Transport),
    ("toll charge highway", Category::Transport),
    ("parking fees", Category::Transport),
    ("car service maintenance", Category::Transport),
    ("taxi fare", Category::Transport),
    ("local train pass", Category::Transport),
    ("bike petrol", Category::Transport),
    ("vehicle insurance", Category::Transport),
    ("driving school fee", Category::Transport),
    ("airport transfer", Category::Transport),
    ("ferry boat ticket", Category::Transport),
    ("cycle rental", Category::Transport),
    ("vehicle repair", Category::Transport),
    ("tyre puncture repair", Category::Transport),
    ("ride sharing", Category::Transport),
    ("cab booking", Category::Transport),
    ("travel card top up", Category::Transport),
    ("meru cab", Category::Transport),
    ("intercity bus", Category::Transport),
    ("railway reservation", Category::Transport),
    ("fuel station", Category::Transport),
    ("highway toll", Category::Transport),
    ("two wheeler service", Category::Transport),
    ("car wash", Category::Transport),
    ("scooter rental", Category::Transport),
    ("jeep ride", Category::Transport),
    ("pickup drop service", Category::Transport),
    ("auto fare", Category::Transport),
    ("rickshaw charge", Category::Transport),
    ("metro token", Category::Transport),
    ("bus pass renewal", Category::Transport),
    ("cab from airport", Category::Transport),
    ("fuel refill", Category::Transport),
    ("oil change", Category::Transport),
    ("car parking charge", Category::Transport),
    ("road trip fuel", Category::Transport),
    ("return cab", Category::Transport),
    ("travel expense reimbursement", Category::Transport),
    ("outstation trip cab", Category::Transport),
    ("daily commute", Category::Transport),
    ("office transport", Category::Transport),

    // Shopping
    ("amazon order", Category::Shopping),
    ("flipkart purchase", Category::Shopping),
    ("myntra clothes", Category::Shopping),
    ("new shoes", Category::Shopping),
    ("jeans tshirt", Category::Shopping),
    ("mobile phone purchase", Category::Shopping),
    ("laptop purchase", Category::Shopping),
    ("headphones earbuds", Category::Shopping),
    ("online shopping", Category::Shopping),
    ("shirt salwar", Category::Shopping),
    ("garments fabric", Category::Shopping),
    ("jewellery accessories", Category::Shopping),
    ("watch sunglasses", Category::Shopping),
    ("home decor items", Category::Shopping),
    ("furniture sofa", Category::Shopping),
    ("electronics gadget", Category::Shopping),
    ("books stationery", Category::Shopping),
    ("beauty cosmetics", Category::Shopping),
    ("skincare products", Category::Shopping),
    ("toys gifts", Category::Shopping),
    ("bought clothes", Category::Shopping),
    ("new dress", Category::Shopping),
    ("kurta pants", Category::Shopping),
    ("saree lehenga", Category::Shopping),
    ("jacket hoodie", Category::Shopping),
    ("sneakers sandals", Category::Shopping),
    ("handbag purse", Category::Shopping),
    ("belt wallet", Category::Shopping),
    ("perfume deodorant", Category::Shopping),
    ("shampoo conditioner", Category::Shopping),
    ("meesho order", Category::Shopping),
    ("ajio purchase", Category::Shopping),
    ("nykaa order", Category::Shopping),
    ("decathlon sports", Category::Shopping),
    ("reliance trends", Category::Shopping),
    ("big bazaar shopping", Category::Shopping),
    ("phone case cover", Category::Shopping),
    ("charger cable", Category::Shopping),
    ("earphones wireless", Category::Shopping),
    ("smart watch", Category::Shopping),
    ("tablet purchase", Category::Shopping),
    ("camera lens", Category::Shopping),
    ("gaming keyboard mouse", Category::Shopping),
    ("office bag", Category::Shopping),
    ("umbrella raincoat", Category::Shopping),
    ("cap hat", Category::Shopping),
    ("sunscreen lotion", Category::Shopping),
    ("gift shopping", Category::Shopping),
    ("household products", Category::Shopping),
    ("detergent soap", Category::Shopping),

    // Bills
    ("electricity bill", Category::Bills),
    ("water bill payment", Category::Bills),
    ("internet broadband bill", Category::Bills),
    ("mobile recharge", Category::Bills),
    ("netflix subscription", Category::Bills),
    ("spotify premium", Category::Bills),
    ("house rent", Category::Bills),
    ("emi payment loan", Category::Bills),
    ("insurance premium", Category::Bills),
    ("gas cylinder booking", Category::Bills),
    ("dth recharge", Category::Bills),
    ("credit card bill", Category::Bills),
    ("postpaid mobile bill", Category::Bills),
    ("cable tv", Category::Bills),
    ("amazon prime subscription", Category::Bills),
    ("hotstar subscription", Category::Bills),
    ("gym membership fee", Category::Bills),
    ("society maintenance", Category::Bills),
    ("taxes payment", Category::Bills),
    ("school fees tuition", Category::Bills),
    ("rent payment", Category::Bills),
    ("monthly emi", Category::Bills),
    ("prepaid recharge", Category::Bills),
    ("broadband bill", Category::Bills),
    ("power bill", Category::Bills),
    ("gas bill", Category::Bills),
    ("dth subscription", Category::Bills),
    ("disney plus hotstar", Category::Bills),
    ("jio recharge", Category::Bills),
    ("airtel recharge", Category::Bills),
    ("bsnl recharge", Category::Bills),
    ("vi vodafone recharge", Category::Bills),
    ("home loan emi", Category::Bills),
    ("car loan emi", Category::Bills),
    ("personal loan emi", Category::Bills),
    ("life insurance", Category::Bills),
    ("health insurance premium", Category::Bills),
    ("term insurance", Category::Bills),
    ("mutual fund sip", Category::Bills),
    ("rd fd installment", Category::Bills),
    ("yearly subscription", Category::Bills),
    ("software subscription", Category::Bills),
    ("cloud storage plan", Category::Bills),
    ("gaming subscription", Category::Bills),
    ("newspapers magazine", Category::Bills),
    ("cooking gas", Category::Bills),
    ("water tanker", Category::Bills),
    ("society charges", Category::Bills),
    ("building maintenance", Category::Bills),
    ("monthly bill payment", Category::Bills),

    // Entertainment
    ("movie tickets pvr", Category::Entertainment),
    ("bookmyshow booking", Category::Entertainment),
    ("concert event pass", Category::Entertainment),
    ("gaming recharge pubg", Category::Entertainment),
    ("steam games purchase", Category::Entertainment),
    ("amusement park entry", Category::Entertainment),
    ("zoo museum ticket", Category::Entertainment),
    ("karaoke outing", Category::Entertainment),
    ("pub bar night out", Category::Entertainment),
    ("bowling alley", Category::Entertainment),
    ("arcade games", Category::Entertainment),
    ("ott platform", Category::Entertainment),
    ("youtube premium", Category::Entertainment),
    ("esports tournament", Category::Entertainment),
    ("party celebration", Category::Entertainment),
    ("club entry cover", Category::Entertainment),
    ("picnic trip", Category::Entertainment),
    ("weekend getaway", Category::Entertainment),
    ("adventure sports", Category::Entertainment),
    ("cinema hall", Category::Entertainment),
    ("imax show", Category::Entertainment),
    ("night out friends", Category::Entertainment),
    ("escape room", Category::Entertainment),
    ("paintball", Category::Entertainment),
    ("laser tag", Category::Entertainment),
    ("theme park", Category::Entertainment),
    ("water park entry", Category::Entertainment),
    ("sports match tickets", Category::Entertainment),
    ("ipl cricket tickets", Category::Entertainment),
    ("stand up comedy show", Category::Entertainment),
    ("theatre play", Category::Entertainment),
    ("music concert", Category::Entertainment),
    ("festival pass", Category::Entertainment),
    ("live event", Category::Entertainment),
    ("house party supplies", Category::Entertainment),
    ("game purchase online", Category::Entertainment),
    ("playstation xbox game", Category::Entertainment),
    ("ludo chess board game", Category::Entertainment),
    ("sport event entry", Category::Entertainment),
    ("karting go kart", Category::Entertainment),
    ("shooting range", Category::Entertainment),
    ("fishing trip", Category::Entertainment),
    ("trekking tour", Category::Entertainment),
    ("camping gear", Category::Entertainment),
    ("beach trip", Category::Entertainment),
    ("night club", Category::Entertainment),
    ("bar drinks", Category::Entertainment),
    ("lounge entry", Category::Entertainment),
    ("movie popcorn", Category::Entertainment),
    ("binge watching subscription", Category::Entertainment),

    // Other
    ("medical checkup", Category::Other),
    ("hospital bill", Category::Other),
    ("medicine pharmacy", Category::Other),
    ("charity donation", Category::Other),
    ("gift friend birthday", Category::Other),
    ("miscellaneous expense", Category::Other),
    ("office supplies", Category::Other),
    ("workshop seminar fee", Category::Other),
    ("bank charges fee", Category::Other),
    ("atm withdrawal", Category::Other),
    ("laundry dry cleaning", Category::Other),
    ("salon haircut", Category::Other),
    ("spa massage", Category::Other),
    ("pet food vet", Category::Other),
    ("plant nursery", Category::Other),
    ("home repair", Category::Other),
    ("plumber electrician", Category::Other),
    ("courier shipping", Category::Other),
    ("printing photocopying", Category::Other),
    ("subscription other", Category::Other),
    ("dentist visit", Category::Other),
    ("eye doctor glasses", Category::Other),
    ("blood test lab", Category::Other),
    ("surgery hospital", Category::Other),
    ("physiotherapy session", Category::Other),
    ("ayurvedic clinic", Category::Other),
    ("birthday gift", Category::Other),
    ("wedding gift", Category::Other),
    ("donation temple", Category::Other),
    ("ngo donation", Category::Other),
    ("penalty fine", Category::Other),
    ("court fee", Category::Other),
    ("notary stamp duty", Category::Other),
    ("passport fee", Category::Other),
    ("visa application", Category::Other),
    ("driving licence renewal", Category::Other),
    ("document printing", Category::Other),
    ("stationery pens", Category::Other),
    ("craft hobby supplies", Category::Other),
    ("art materials", Category::Other),
    ("tailoring stitching", Category::Other),
    ("shoe repair cobbler", Category::Other),
    ("watch repair", Category::Other),
    ("mobile repair", Category::Other),
    ("laptop repair", Category::Other),
    ("pest control", Category::Other),
    ("AC service", Category::Other),
    ("washing machine repair", Category::Other),
    ("carpenter work", Category::Other),
    ("cleaning service", Category::Other),
    ("blood donation camp", Category::Other),
];

/// The built-in corpus, in a fixed order
pub fn builtin_corpus() -> Vec<TrainingExample> {
    BUILTIN_EXAMPLES
        .iter()
        .map(|(description, category)| TrainingExample::new(*description, *category))
        .collect()
}

#[derive(Debug, Deserialize)]
struct CorpusRow {
    description: String,
    category: String,
}

/// Parse a `description,category` CSV corpus
pub fn parse_corpus_csv<R: Read>(reader: R) -> Result<Vec<TrainingExample>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut examples = Vec::new();
    for (i, row) in csv_reader.deserialize::<CorpusRow>().enumerate() {
        let row = row?;
        // Header is line 1
        let line = i + 2;
        if row.description.is_empty() {
            return Err(Error::Validation(format!(
                "Corpus line {}: empty description",
                line
            )));
        }
        let category = row
            .category
            .parse::<Category>()
            .map_err(|e| Error::Validation(format!("Corpus line {}: {}", line, e)))?;
        examples.push(TrainingExample::new(row.description, category));
    }

    if examples.is_empty() {
        return Err(Error::Validation("Corpus contains no examples".to_string()));
    }
    Ok(examples)
}

/// Load a CSV corpus from disk
pub fn load_corpus_csv(path: &Path) -> Result<Vec<TrainingExample>> {
    let file = std::fs::File::open(path)?;
    parse_corpus_csv(file)
}
