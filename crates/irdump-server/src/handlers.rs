use actix_web::{get, web, HttpResponse, Responder};
use irdump_spider::catalog;
use irdump_spider::quote::{Quote, QuoteSource};
use std::path::PathBuf;
use std::sync::Arc;
use tera::{Context, Tera};

/// Shared, read-only state behind every handler.
pub struct AppState {
    pub data_root: PathBuf,
    pub quotes: Arc<dyn QuoteSource>,
    pub tera: Tera,
}

/// Templates compiled into the binary.
pub fn templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("index.html", include_str!("../templates/index.html")),
        ("company.html", include_str!("../templates/company.html")),
    ])?;
    Ok(tera)
}

#[derive(serde::Serialize)]
struct CompanyLink {
    slug: String,
    name: String,
}

/// Quote figures as displayed; missing figures read `n/a`.
#[derive(serde::Serialize)]
struct QuoteView {
    price: String,
    currency: String,
    market_cap: String,
}

impl From<Quote> for QuoteView {
    fn from(quote: Quote) -> Self {
        let or_na =
            |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| v.to_string());
        Self {
            price: or_na(quote.price),
            currency: quote.currency.unwrap_or_default(),
            market_cap: or_na(quote.market_cap),
        }
    }
}

/// Home page: every scraped company.
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> impl Responder {
    let companies = match catalog::list_companies(&state.data_root).await {
        Ok(companies) => companies,
        Err(err) => {
            tracing::error!("failed to list companies, error({err})");
            return HttpResponse::InternalServerError().body("Failed to list companies");
        }
    };

    let companies: Vec<CompanyLink> = companies
        .into_iter()
        .map(|slug| CompanyLink {
            name: catalog::display_name(&slug),
            slug,
        })
        .collect();

    let mut context = Context::new();
    context.insert("companies", &companies);
    render(&state.tera, "index.html", &context)
}

/// One company's downloaded files, with a live quote when it has a ticker.
#[get("/{company}")]
pub async fn company_page(
    company: web::Path<String>,
    state: web::Data<AppState>,
) -> impl Responder {
    let slug = company.into_inner();

    let files = match catalog::company_files(&state.data_root, &slug).await {
        Ok(Some(files)) => files,
        Ok(None) => return HttpResponse::NotFound().body("Company not found"),
        Err(err) => {
            tracing::error!("failed to read files for {slug}, error({err})");
            return HttpResponse::InternalServerError().body("Failed to read company files");
        }
    };

    let ticker = match catalog::company_dir(&state.data_root, &slug) {
        Some(dir) => catalog::read_metadata(&dir).await.and_then(|meta| meta.ticker),
        None => None,
    };
    let quote = match ticker.as_deref().filter(|ticker| !ticker.is_empty()) {
        Some(ticker) => state.quotes.fetch_quote(ticker).await.map(QuoteView::from),
        None => None,
    };

    let mut context = Context::new();
    context.insert("name", &catalog::display_name(&slug));
    context.insert("slug", &slug);
    context.insert("files", &files);
    context.insert("quote", &quote);
    render(&state.tera, "company.html", &context)
}

fn render(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(rendered) => HttpResponse::Ok().content_type("text/html").body(rendered),
        Err(err) => {
            tracing::error!("failed to render {template}, error({err})");
            HttpResponse::InternalServerError().body("Failed to render page")
        }
    }
}
