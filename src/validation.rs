//! Request Validation - turns raw JSON bodies into typed insert values and
//! patches, collecting every failing field instead of stopping at the first.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::models::{
    BlogPostPatch, MetaTagPatch, NewBlogPost, NewContactSubmission, NewMetaTag,
    NewPortfolioProject, NewTestimonial, NewUser, PortfolioProjectPatch, TestimonialPatch,
};

lazy_static::lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref URL_BASE: url::Url = url::Url::parse("http://localhost/").unwrap();
}

// ============================================================================
// Error types
// ============================================================================

/// One step in the location of a failing value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: Vec<PathSegment>,
    pub message: String,
}

/// Every field that failed validation, in the order they were checked.
#[derive(Debug, Clone, PartialEq, Default, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// True if some error points at `field`.
    #[cfg(test)]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| {
            matches!(e.path.first(), Some(PathSegment::Field(name)) if name == field)
        })
    }
}

// ============================================================================
// Field reader
// ============================================================================

/// Length rule for string fields, counted in characters.
#[derive(Debug, Clone, Copy)]
struct Len {
    min: usize,
    max: Option<usize>,
}

const NON_EMPTY: Len = Len { min: 1, max: None };

const fn between(min: usize, max: usize) -> Len {
    Len {
        min,
        max: Some(max),
    }
}

#[derive(Debug, Clone, Copy)]
enum Item {
    Text,
    Url,
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Absolute URLs, or site-relative paths such as `/uploads/x.png`.
fn is_url(value: &str) -> bool {
    if value.starts_with('/') && !value.starts_with("//") {
        return URL_BASE.join(value).is_ok();
    }
    url::Url::parse(value).is_ok()
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Reads fields out of a JSON object. In create mode a missing required field
/// is an error; in patch mode every field may be absent. `null` counts as
/// absent.
struct Fields<'a> {
    body: &'a Map<String, Value>,
    partial: bool,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    fn create(body: &'a Value) -> Result<Self, ValidationErrors> {
        Self::new(body, false)
    }

    fn patch(body: &'a Value) -> Result<Self, ValidationErrors> {
        Self::new(body, true)
    }

    fn new(body: &'a Value, partial: bool) -> Result<Self, ValidationErrors> {
        match body {
            Value::Object(body) => Ok(Self {
                body,
                partial,
                errors: Vec::new(),
            }),
            other => Err(ValidationErrors {
                errors: vec![FieldError {
                    path: Vec::new(),
                    message: format!("Expected object, received {}", json_type(other)),
                }],
            }),
        }
    }

    fn fail(&mut self, path: Vec<PathSegment>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path,
            message: message.into(),
        });
    }

    fn fail_field(&mut self, name: &str, message: impl Into<String>) {
        self.fail(vec![PathSegment::Field(name.to_string())], message);
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.body.get(name).filter(|v| !v.is_null())
    }

    fn missing(&mut self, name: &str, required: bool) {
        if required && !self.partial {
            self.fail_field(name, "Required");
        }
    }

    fn raw_string(&mut self, name: &str, required: bool) -> Option<String> {
        match self.get(name) {
            None => {
                self.missing(name, required);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                let message = format!("Expected string, received {}", json_type(other));
                self.fail_field(name, message);
                None
            }
        }
    }

    /// Required string with a length rule. Whitespace-only input is rejected.
    fn string(&mut self, name: &str, len: Len) -> Option<String> {
        let value = self.raw_string(name, true)?;
        let count = value.chars().count();

        if count < len.min {
            if len.min == 1 {
                self.fail_field(name, format!("{} is required", label(name)));
            } else {
                self.fail_field(
                    name,
                    format!("String must contain at least {} character(s)", len.min),
                );
            }
            return None;
        }
        if let Some(max) = len.max {
            if count > max {
                self.fail_field(
                    name,
                    format!("String must contain at most {max} character(s)"),
                );
                return None;
            }
        }
        if value.trim().is_empty() {
            self.fail_field(name, format!("{} must not be blank", label(name)));
            return None;
        }
        Some(value)
    }

    fn optional_string(&mut self, name: &str) -> Option<String> {
        self.raw_string(name, false)
    }

    /// Optional URL; the empty string is accepted and means "none".
    fn optional_url(&mut self, name: &str) -> Option<String> {
        let value = self.raw_string(name, false)?;
        if !value.is_empty() && !is_url(&value) {
            self.fail_field(name, "Must be a valid URL");
            return None;
        }
        Some(value)
    }

    fn email(&mut self, name: &str) -> Option<String> {
        let value = self.raw_string(name, true)?;
        if !is_email(&value) {
            self.fail_field(name, "Invalid email");
            return None;
        }
        Some(value)
    }

    fn list(&mut self, name: &str, item: Item, min_items: Option<(usize, &str)>) -> Option<Vec<String>> {
        let items = match self.get(name) {
            None => {
                self.missing(name, min_items.is_some());
                return None;
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                let message = format!("Expected array, received {}", json_type(other));
                self.fail_field(name, message);
                return None;
            }
        };

        let mut values = Vec::with_capacity(items.len());
        let mut ok = true;
        for (index, entry) in items.iter().enumerate() {
            let path = vec![PathSegment::Field(name.to_string()), PathSegment::Index(index)];
            match (entry, item) {
                (Value::String(s), Item::Url) if !is_url(s) => {
                    self.fail(path, "Must be a valid URL");
                    ok = false;
                }
                (Value::String(s), _) => values.push(s.clone()),
                (other, _) => {
                    let message = format!("Expected string, received {}", json_type(other));
                    self.fail(path, message);
                    ok = false;
                }
            }
        }

        if let Some((min, message)) = min_items {
            if items.len() < min {
                self.fail_field(name, message);
                return None;
            }
        }
        ok.then_some(values)
    }

    fn boolean(&mut self, name: &str) -> Option<bool> {
        match self.get(name) {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                let message = format!("Expected boolean, received {}", json_type(other));
                self.fail_field(name, message);
                None
            }
        }
    }

    fn integer(&mut self, name: &str, required: bool, min: i64, max: i64) -> Option<i64> {
        let value = match self.get(name) {
            None => {
                self.missing(name, required);
                return None;
            }
            Some(Value::Number(n)) => n,
            Some(other) => {
                let message = format!("Expected number, received {}", json_type(other));
                self.fail_field(name, message);
                return None;
            }
        };

        let Some(int) = value.as_i64() else {
            let message = if value.as_f64().is_some_and(|f| f.fract() != 0.0) {
                "Expected integer, received float"
            } else {
                "Number is out of range"
            };
            self.fail_field(name, message);
            return None;
        };
        if int < min {
            self.fail_field(name, format!("Number must be greater than or equal to {min}"));
            return None;
        }
        if int > max {
            self.fail_field(name, format!("Number must be less than or equal to {max}"));
            return None;
        }
        Some(int)
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

/// `clientName` -> `Client name`, used in "is required" messages.
fn label(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Patch semantics for nullable strings: an empty string clears the field.
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| if v.is_empty() { None } else { Some(v) })
}

// ============================================================================
// Users and login
// ============================================================================

#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

pub fn validate_login(body: &Value) -> Result<LoginCredentials, ValidationErrors> {
    let user = validate_new_user(body)?;
    Ok(LoginCredentials {
        username: user.username,
        password: user.password,
    })
}

pub fn validate_new_user(body: &Value) -> Result<NewUser, ValidationErrors> {
    let mut f = Fields::create(body)?;
    let username = f.string("username", NON_EMPTY);
    let password = f.string("password", NON_EMPTY);
    f.finish()?;

    Ok(NewUser {
        username: username.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}

// ============================================================================
// Contact submissions
// ============================================================================

pub fn validate_new_contact(body: &Value) -> Result<NewContactSubmission, ValidationErrors> {
    let mut f = Fields::create(body)?;
    let name = f.string("name", NON_EMPTY);
    let email = f.email("email");
    let phone = f.string("phone", NON_EMPTY);
    let service = f.string("service", NON_EMPTY);
    let message = f.string("message", NON_EMPTY);
    let budget = f.optional_string("budget");
    let timeline = f.optional_string("timeline");
    let project_scope = f.optional_string("projectScope");
    f.finish()?;

    Ok(NewContactSubmission {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        service: service.unwrap_or_default(),
        message: message.unwrap_or_default(),
        budget,
        timeline,
        project_scope,
    })
}

// ============================================================================
// Blog posts
// ============================================================================

const BLOG_TITLE: Len = between(1, 100);
const BLOG_SUMMARY: Len = between(1, 200);

pub fn validate_new_blog_post(body: &Value) -> Result<NewBlogPost, ValidationErrors> {
    let mut f = Fields::create(body)?;
    let title = f.string("title", BLOG_TITLE);
    let summary = f.string("summary", BLOG_SUMMARY);
    let content = f.string("content", NON_EMPTY);
    let author = f.string("author", NON_EMPTY);
    let image_url = f.optional_url("imageUrl");
    let category = f.optional_string("category");
    let tags = f.list("tags", Item::Text, None);
    let seo_title = f.optional_string("seoTitle");
    let seo_description = f.optional_string("seoDescription");
    let is_published = f.boolean("isPublished");
    f.finish()?;

    Ok(NewBlogPost {
        title: title.unwrap_or_default(),
        summary: summary.unwrap_or_default(),
        content: content.unwrap_or_default(),
        author: author.unwrap_or_default(),
        image_url,
        category,
        tags,
        seo_title,
        seo_description,
        is_published,
    })
}

pub fn validate_blog_post_patch(body: &Value) -> Result<BlogPostPatch, ValidationErrors> {
    let mut f = Fields::patch(body)?;
    let patch = BlogPostPatch {
        title: f.string("title", BLOG_TITLE),
        summary: f.string("summary", BLOG_SUMMARY),
        content: f.string("content", NON_EMPTY),
        author: f.string("author", NON_EMPTY),
        image_url: clearable(f.optional_url("imageUrl")),
        category: f.string("category", NON_EMPTY),
        tags: f.list("tags", Item::Text, None),
        seo_title: clearable(f.optional_string("seoTitle")),
        seo_description: clearable(f.optional_string("seoDescription")),
        is_published: f.boolean("isPublished"),
    };
    f.finish()?;
    Ok(patch)
}

// ============================================================================
// Testimonials
// ============================================================================

const TESTIMONIAL_TEXT: Len = between(20, 500);

/// `isApproved` is never read from client input.
pub fn validate_new_testimonial(body: &Value) -> Result<NewTestimonial, ValidationErrors> {
    let mut f = Fields::create(body)?;
    let client_name = f.string("clientName", NON_EMPTY);
    let company = f.optional_string("company");
    let testimonial = f.string("testimonial", TESTIMONIAL_TEXT);
    let rating = f.integer("rating", true, 1, 5);
    let project_type = f.string("projectType", NON_EMPTY);
    let image_url = f.optional_url("imageUrl");
    f.finish()?;

    Ok(NewTestimonial {
        client_name: client_name.unwrap_or_default(),
        company,
        testimonial: testimonial.unwrap_or_default(),
        rating: rating.and_then(|r| u8::try_from(r).ok()).unwrap_or_default(),
        project_type: project_type.unwrap_or_default(),
        image_url,
    })
}

pub fn validate_testimonial_patch(body: &Value) -> Result<TestimonialPatch, ValidationErrors> {
    let mut f = Fields::patch(body)?;
    let patch = TestimonialPatch {
        client_name: f.string("clientName", NON_EMPTY),
        company: clearable(f.optional_string("company")),
        testimonial: f.string("testimonial", TESTIMONIAL_TEXT),
        rating: f
            .integer("rating", false, 1, 5)
            .and_then(|r| u8::try_from(r).ok()),
        project_type: f.string("projectType", NON_EMPTY),
        image_url: clearable(f.optional_url("imageUrl")),
    };
    f.finish()?;
    Ok(patch)
}

// ============================================================================
// Portfolio projects
// ============================================================================

const IMAGES_REQUIRED: (usize, &str) = (1, "At least one image is required");

fn testimonial_id(f: &mut Fields<'_>) -> Option<i32> {
    f.integer("testimonialId", false, i32::MIN.into(), i32::MAX.into())
        .and_then(|id| i32::try_from(id).ok())
}

pub fn validate_new_portfolio_project(
    body: &Value,
) -> Result<NewPortfolioProject, ValidationErrors> {
    let mut f = Fields::create(body)?;
    let title = f.string("title", NON_EMPTY);
    let description = f.string("description", NON_EMPTY);
    let category = f.string("category", NON_EMPTY);
    let image_urls = f.list("imageUrls", Item::Url, Some(IMAGES_REQUIRED));
    let client_name = f.optional_string("clientName");
    let completion_date = f.optional_string("completionDate");
    let location = f.optional_string("location");
    let services = f.list("services", Item::Text, None);
    let testimonial_id = testimonial_id(&mut f);
    let before_images = f.list("beforeImages", Item::Url, None);
    let after_images = f.list("afterImages", Item::Url, None);
    let featured = f.boolean("featured");
    f.finish()?;

    Ok(NewPortfolioProject {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        category: category.unwrap_or_default(),
        image_urls: image_urls.unwrap_or_default(),
        client_name,
        completion_date,
        location,
        services,
        testimonial_id,
        before_images,
        after_images,
        featured,
    })
}

pub fn validate_portfolio_project_patch(
    body: &Value,
) -> Result<PortfolioProjectPatch, ValidationErrors> {
    let mut f = Fields::patch(body)?;
    let patch = PortfolioProjectPatch {
        title: f.string("title", NON_EMPTY),
        description: f.string("description", NON_EMPTY),
        category: f.string("category", NON_EMPTY),
        image_urls: f.list("imageUrls", Item::Url, Some(IMAGES_REQUIRED)),
        client_name: clearable(f.optional_string("clientName")),
        completion_date: clearable(f.optional_string("completionDate")),
        location: clearable(f.optional_string("location")),
        services: f.list("services", Item::Text, None),
        testimonial_id: testimonial_id(&mut f),
        before_images: f.list("beforeImages", Item::Url, None),
        after_images: f.list("afterImages", Item::Url, None),
        featured: f.boolean("featured"),
    };
    f.finish()?;
    Ok(patch)
}

// ============================================================================
// Meta tags
// ============================================================================

pub fn validate_new_meta_tag(body: &Value) -> Result<NewMetaTag, ValidationErrors> {
    let mut f = Fields::create(body)?;
    let page_path = f.string("pagePath", NON_EMPTY);
    let title = f.string("title", NON_EMPTY);
    let description = f.string("description", NON_EMPTY);
    let keywords = f.optional_string("keywords");
    let og_title = f.optional_string("ogTitle");
    let og_description = f.optional_string("ogDescription");
    let og_image = f.optional_url("ogImage");
    let twitter_title = f.optional_string("twitterTitle");
    let twitter_description = f.optional_string("twitterDescription");
    let twitter_image = f.optional_url("twitterImage");
    f.finish()?;

    Ok(NewMetaTag {
        page_path: page_path.unwrap_or_default(),
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        keywords,
        og_title,
        og_description,
        og_image,
        twitter_title,
        twitter_description,
        twitter_image,
    })
}

pub fn validate_meta_tag_patch(body: &Value) -> Result<MetaTagPatch, ValidationErrors> {
    let mut f = Fields::patch(body)?;
    let patch = MetaTagPatch {
        page_path: f.string("pagePath", NON_EMPTY),
        title: f.string("title", NON_EMPTY),
        description: f.string("description", NON_EMPTY),
        keywords: clearable(f.optional_string("keywords")),
        og_title: clearable(f.optional_string("ogTitle")),
        og_description: clearable(f.optional_string("ogDescription")),
        og_image: clearable(f.optional_url("ogImage")),
        twitter_title: clearable(f.optional_string("twitterTitle")),
        twitter_description: clearable(f.optional_string("twitterDescription")),
        twitter_image: clearable(f.optional_url("twitterImage")),
    };
    f.finish()?;
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages_for(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .errors
            .iter()
            .filter(|e| matches!(e.path.first(), Some(PathSegment::Field(n)) if n == field))
            .map(|e| e.message.clone())
            .collect()
    }

    #[test]
    fn test_contact_reports_every_failing_field() {
        let err = validate_new_contact(&json!({
            "name": "",
            "email": "not-an-email",
            "phone": 5551234,
            "service": "",
            "message": "   "
        }))
        .unwrap_err();

        for field in ["name", "email", "phone", "service", "message"] {
            assert!(err.has_field(field), "missing error for {field}");
        }
        assert_eq!(err.errors.len(), 5);
        assert_eq!(messages_for(&err, "email"), vec!["Invalid email"]);
        assert_eq!(messages_for(&err, "service"), vec!["Service is required"]);
        assert_eq!(
            messages_for(&err, "phone"),
            vec!["Expected string, received number"]
        );
    }

    #[test]
    fn test_contact_accepts_short_values() {
        let new = validate_new_contact(&json!({
            "name": "J",
            "email": "j@example.com",
            "phone": "555-1234",
            "service": "Repair",
            "message": "Call me"
        }))
        .unwrap();

        assert_eq!(new.name, "J");
        assert_eq!(new.phone, "555-1234");
        assert_eq!(new.message, "Call me");
    }

    #[test]
    fn test_contact_accepts_valid_body() {
        let new = validate_new_contact(&json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "555-123-4567",
            "service": "Renovation",
            "message": "Please call me about a kitchen remodel.",
            "budget": "$50k",
            "unknownField": true
        }))
        .unwrap();

        assert_eq!(new.name, "Jane Doe");
        assert_eq!(new.budget.as_deref(), Some("$50k"));
        assert_eq!(new.timeline, None);
    }

    #[test]
    fn test_missing_fields_are_required() {
        let err = validate_new_blog_post(&json!({})).unwrap_err();
        assert_eq!(messages_for(&err, "title"), vec!["Required"]);
        assert!(err.has_field("summary"));
        assert!(err.has_field("content"));
        assert!(err.has_field("author"));
    }

    #[test]
    fn test_non_object_body_rejected() {
        let err = validate_new_meta_tag(&json!([1, 2])).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.errors[0].path.is_empty());
        assert_eq!(err.errors[0].message, "Expected object, received array");
    }

    #[test]
    fn test_type_mismatch_is_a_field_error() {
        let err = validate_new_blog_post(&json!({
            "title": 42,
            "summary": "S",
            "content": "C",
            "author": "A",
            "isPublished": "yes"
        }))
        .unwrap_err();

        assert_eq!(
            messages_for(&err, "title"),
            vec!["Expected string, received number"]
        );
        assert_eq!(
            messages_for(&err, "isPublished"),
            vec!["Expected boolean, received string"]
        );
    }

    #[test]
    fn test_blog_title_length_limits() {
        let long = "x".repeat(101);
        let err = validate_new_blog_post(&json!({
            "title": long, "summary": "S", "content": "C", "author": "A"
        }))
        .unwrap_err();
        assert_eq!(
            messages_for(&err, "title"),
            vec!["String must contain at most 100 character(s)"]
        );
    }

    #[test]
    fn test_whitespace_only_required_string_rejected() {
        let err = validate_new_blog_post(&json!({
            "title": "   ", "summary": "S", "content": "C", "author": "A"
        }))
        .unwrap_err();
        assert!(err.has_field("title"));
    }

    #[test]
    fn test_blog_image_url_empty_string_allowed() {
        let new = validate_new_blog_post(&json!({
            "title": "T", "summary": "S", "content": "C", "author": "A", "imageUrl": ""
        }))
        .unwrap();
        assert_eq!(new.image_url.as_deref(), Some(""));

        let err = validate_new_blog_post(&json!({
            "title": "T", "summary": "S", "content": "C", "author": "A", "imageUrl": "nope"
        }))
        .unwrap_err();
        assert_eq!(messages_for(&err, "imageUrl"), vec!["Must be a valid URL"]);
    }

    #[test]
    fn test_relative_upload_path_is_a_url() {
        assert!(is_url("/uploads/abc.png"));
        assert!(is_url("https://example.com/a.jpg"));
        assert!(!is_url("//evil.example.com/a.jpg"));
        assert!(!is_url("a.jpg"));
    }

    #[test]
    fn test_patch_allows_missing_fields() {
        let patch = validate_blog_post_patch(&json!({ "title": "Test2" })).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Test2"));
        assert!(patch.summary.is_none());
        assert!(patch.image_url.is_none());
        assert!(patch.tags.is_none());
    }

    #[test]
    fn test_patch_still_checks_present_fields() {
        let err = validate_blog_post_patch(&json!({ "title": "" })).unwrap_err();
        assert!(err.has_field("title"));
    }

    #[test]
    fn test_blog_patch_rejects_empty_category() {
        let err = validate_blog_post_patch(&json!({ "category": "" })).unwrap_err();
        assert_eq!(messages_for(&err, "category"), vec!["Category is required"]);

        let patch = validate_blog_post_patch(&json!({ "category": "Tips" })).unwrap();
        assert_eq!(patch.category.as_deref(), Some("Tips"));
    }

    #[test]
    fn test_patch_empty_string_clears_nullable_field() {
        let patch = validate_blog_post_patch(&json!({ "imageUrl": "", "seoTitle": null })).unwrap();
        assert_eq!(patch.image_url, Some(None));
        assert_eq!(patch.seo_title, None);
    }

    #[test]
    fn test_testimonial_rating_bounds_and_ignores_approval() {
        let body = json!({
            "clientName": "",
            "testimonial": "too short",
            "rating": 6,
            "projectType": "Residential",
            "isApproved": true
        });
        let err = validate_new_testimonial(&body).unwrap_err();
        assert!(err.has_field("clientName"));
        assert!(err.has_field("testimonial"));
        assert_eq!(
            messages_for(&err, "rating"),
            vec!["Number must be less than or equal to 5"]
        );
        assert!(!err.has_field("isApproved"));

        let ok = validate_new_testimonial(&json!({
            "clientName": "X",
            "testimonial": "Great work on our new deck, thank you!",
            "rating": 5,
            "projectType": "Residential",
            "isApproved": true
        }))
        .unwrap();
        assert_eq!(ok.client_name, "X");
        assert_eq!(ok.rating, 5);

        let patch = validate_testimonial_patch(&json!({ "clientName": "Y" })).unwrap();
        assert_eq!(patch.client_name.as_deref(), Some("Y"));
    }

    #[test]
    fn test_testimonial_rating_must_be_integer() {
        let err = validate_new_testimonial(&json!({
            "clientName": "Xavier",
            "testimonial": "Great work on our new deck, thank you!",
            "rating": 4.5,
            "projectType": "Residential"
        }))
        .unwrap_err();
        assert_eq!(
            messages_for(&err, "rating"),
            vec!["Expected integer, received float"]
        );
    }

    #[test]
    fn test_portfolio_requires_an_image() {
        let err = validate_new_portfolio_project(&json!({
            "title": "T",
            "description": "D",
            "category": "Residential",
            "imageUrls": []
        }))
        .unwrap_err();
        assert_eq!(
            messages_for(&err, "imageUrls"),
            vec!["At least one image is required"]
        );
    }

    #[test]
    fn test_portfolio_reports_bad_list_items_by_index() {
        let err = validate_new_portfolio_project(&json!({
            "title": "T",
            "description": "D",
            "category": "Residential",
            "imageUrls": ["https://example.com/a.jpg", "bad"],
            "services": ["Design", 3]
        }))
        .unwrap_err();

        let paths: Vec<Vec<PathSegment>> = err.errors.iter().map(|e| e.path.clone()).collect();
        assert!(paths.contains(&vec![
            PathSegment::Field("imageUrls".to_string()),
            PathSegment::Index(1)
        ]));
        assert!(paths.contains(&vec![
            PathSegment::Field("services".to_string()),
            PathSegment::Index(1)
        ]));
    }

    #[test]
    fn test_portfolio_testimonial_id_parsed() {
        let new = validate_new_portfolio_project(&json!({
            "title": "T",
            "description": "D",
            "category": "Residential",
            "imageUrls": ["/uploads/a.png"],
            "testimonialId": 7
        }))
        .unwrap();
        assert_eq!(new.testimonial_id, Some(7));
        assert_eq!(new.featured, None);
    }

    #[test]
    fn test_meta_tag_image_urls_checked() {
        let err = validate_new_meta_tag(&json!({
            "pagePath": "/about",
            "title": "About",
            "description": "About us",
            "ogImage": "not a url",
            "twitterImage": ""
        }))
        .unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.has_field("ogImage"));
    }

    #[test]
    fn test_login_messages() {
        let err = validate_login(&json!({ "username": "", "password": "" })).unwrap_err();
        assert_eq!(messages_for(&err, "username"), vec!["Username is required"]);
        assert_eq!(messages_for(&err, "password"), vec!["Password is required"]);
    }

    #[test]
    fn test_field_error_serializes_mixed_path() {
        let error = FieldError {
            path: vec![PathSegment::Field("imageUrls".to_string()), PathSegment::Index(0)],
            message: "Must be a valid URL".to_string(),
        };
        let json = serde_json::to_value(error).unwrap();
        assert_eq!(json, json!({ "path": ["imageUrls", 0], "message": "Must be a valid URL" }));
    }

    #[test]
    fn test_label_from_camel_case() {
        assert_eq!(label("clientName"), "Client name");
        assert_eq!(label("title"), "Title");
    }
}
