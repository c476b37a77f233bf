use std::path::{Path, PathBuf};

/// A company whose investor-relations page is scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    /// Display name; unique within a roster.
    pub name: String,
    /// Stock ticker; `None` for private companies.
    pub ticker: Option<String>,
    /// Investor-relations page, the entry point for link discovery.
    pub ir_url: String,
}

impl Company {
    pub fn new(name: &str, ticker: Option<&str>, ir_url: &str) -> Self {
        Self {
            name: name.to_string(),
            ticker: ticker.map(str::to_string),
            ir_url: ir_url.to_string(),
        }
    }

    /// Directory key: the lower-cased name with spaces replaced by underscores.
    ///
    /// ```rust
    /// use irdump_spider::roster::Company;
    ///
    /// let company = Company::new("Dave Inc.", Some("DAVE"), "https://investors.dave.com/");
    /// assert_eq!(company.slug(), "dave_inc.");
    /// ```
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }

    /// `<data_root>/<slug>`
    pub fn dir(&self, data_root: &Path) -> PathBuf {
        data_root.join(self.slug())
    }
}

/// Immutable, ordered list of companies handed to the batch runner.
#[derive(Debug, Clone, Default)]
pub struct Roster(Vec<Company>);

impl Roster {
    pub fn new(companies: Vec<Company>) -> Self {
        Self(companies)
    }

    /// The hand-curated fintech roster: listed companies with their tickers, plus private
    /// companies whose public site is scraped instead.
    pub fn fintech() -> Self {
        FINTECH
            .iter()
            .map(|(name, ticker, ir_url)| Company::new(name, *ticker, ir_url))
            .collect::<Vec<_>>()
            .into()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Company> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Company>> for Roster {
    fn from(companies: Vec<Company>) -> Self {
        Self(companies)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Company;
    type IntoIter = std::slice::Iter<'a, Company>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// (name, ticker, IR page)
static FINTECH: &[(&str, Option<&str>, &str)] = &[
    ("Dave Inc.", Some("DAVE"), "https://investors.dave.com/"),
    ("SoFi Technologies", Some("SOFI"), "https://investors.sofi.com/"),
    ("Upstart Holdings", Some("UPST"), "https://ir.upstart.com/"),
    ("LendingClub Corp.", Some("LC"), "https://ir.lendingclub.com/"),
    ("Affirm Holdings", Some("AFRM"), "https://investors.affirm.com/"),
    ("Block Inc.", Some("SQ"), "https://investors.block.xyz/"),
    ("PayPal Holdings", Some("PYPL"), "https://investor.pypl.com/"),
    ("Robinhood Markets", Some("HOOD"), "https://investors.robinhood.com/"),
    ("Coinbase Global", Some("COIN"), "https://investor.coinbase.com/"),
    ("Varo Bank", None, "https://www.varomoney.com"),
    ("Chime", None, "https://www.chime.com"),
    ("Stripe", None, "https://stripe.com"),
    ("Brex", None, "https://www.brex.com"),
    ("Plaid", None, "https://plaid.com"),
    ("Marqeta", Some("MQ"), "https://investors.marqeta.com/"),
    ("Ramp", None, "https://ramp.com"),
    ("Current", None, "https://current.com"),
    ("Upgrade", None, "https://upgrade.com"),
    ("Adyen", Some("ADYEN"), "https://investors.adyen.com/"),
    ("Nu Holdings (Nubank)", Some("NU"), "https://investors.nu/"),
    ("Wise plc", Some("WISE"), "https://wise.com/investors"),
    ("Revolut", None, "https://www.revolut.com"),
    ("Monzo", None, "https://monzo.com"),
    ("Starling Bank", None, "https://www.starlingbank.com"),
    ("N26", None, "https://n26.com"),
];
