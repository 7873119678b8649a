//! Store Models - records held by the in-memory store, their insert shapes,
//! and the typed partial-update patches applied to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category given to blog posts created without one
pub const DEFAULT_BLOG_CATEGORY: &str = "general";

// ============================================================================
// User
// ============================================================================

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
}

/// New user for insertion
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Contact submissions
// ============================================================================

/// Contact form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub project_scope: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// New contact submission for insertion
#[derive(Debug, Clone, Default)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub project_scope: Option<String>,
}

// ============================================================================
// Blog posts
// ============================================================================

/// Blog post model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New blog post for creation
#[derive(Debug, Clone, Default)]
pub struct NewBlogPost {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_published: Option<bool>,
}

/// Blog post update. `Some(None)` on a nullable field clears it.
#[derive(Debug, Clone, Default)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<Option<String>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub seo_title: Option<Option<String>>,
    pub seo_description: Option<Option<String>>,
    pub is_published: Option<bool>,
}

impl BlogPost {
    /// Merge a patch onto the post. `tags` is replaced wholesale when present.
    pub(crate) fn apply(&mut self, patch: BlogPostPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.summary, patch.summary);
        merge(&mut self.content, patch.content);
        merge(&mut self.author, patch.author);
        merge(&mut self.image_url, patch.image_url);
        merge(&mut self.category, patch.category);
        merge(&mut self.tags, patch.tags);
        merge(&mut self.seo_title, patch.seo_title);
        merge(&mut self.seo_description, patch.seo_description);
        merge(&mut self.is_published, patch.is_published);
    }
}

// ============================================================================
// Testimonials
// ============================================================================

/// Client testimonial, hidden from the public until approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: i32,
    pub client_name: String,
    pub company: Option<String>,
    pub testimonial: String,
    pub rating: u8,
    pub project_type: String,
    pub image_url: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// New testimonial for insertion. There is no approval field: submissions
/// always start unapproved.
#[derive(Debug, Clone, Default)]
pub struct NewTestimonial {
    pub client_name: String,
    pub company: Option<String>,
    pub testimonial: String,
    pub rating: u8,
    pub project_type: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TestimonialPatch {
    pub client_name: Option<String>,
    pub company: Option<Option<String>>,
    pub testimonial: Option<String>,
    pub rating: Option<u8>,
    pub project_type: Option<String>,
    pub image_url: Option<Option<String>>,
}

impl Testimonial {
    pub(crate) fn apply(&mut self, patch: TestimonialPatch) {
        merge(&mut self.client_name, patch.client_name);
        merge(&mut self.company, patch.company);
        merge(&mut self.testimonial, patch.testimonial);
        merge(&mut self.rating, patch.rating);
        merge(&mut self.project_type, patch.project_type);
        merge(&mut self.image_url, patch.image_url);
    }
}

// ============================================================================
// Portfolio projects
// ============================================================================

/// Portfolio project. `testimonial_id` is a lookup hint only and may point at
/// a testimonial that no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProject {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_urls: Vec<String>,
    pub client_name: Option<String>,
    pub completion_date: Option<String>,
    pub location: Option<String>,
    pub services: Vec<String>,
    pub testimonial_id: Option<i32>,
    pub before_images: Vec<String>,
    pub after_images: Vec<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New portfolio project for creation
#[derive(Debug, Clone, Default)]
pub struct NewPortfolioProject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_urls: Vec<String>,
    pub client_name: Option<String>,
    pub completion_date: Option<String>,
    pub location: Option<String>,
    pub services: Option<Vec<String>>,
    pub testimonial_id: Option<i32>,
    pub before_images: Option<Vec<String>>,
    pub after_images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

/// Portfolio project update. List fields replace the stored list.
#[derive(Debug, Clone, Default)]
pub struct PortfolioProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub client_name: Option<Option<String>>,
    pub completion_date: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub services: Option<Vec<String>>,
    pub testimonial_id: Option<i32>,
    pub before_images: Option<Vec<String>>,
    pub after_images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

impl PortfolioProject {
    pub(crate) fn apply(&mut self, patch: PortfolioProjectPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge(&mut self.category, patch.category);
        merge(&mut self.image_urls, patch.image_urls);
        merge(&mut self.client_name, patch.client_name);
        merge(&mut self.completion_date, patch.completion_date);
        merge(&mut self.location, patch.location);
        merge(&mut self.services, patch.services);
        if let Some(id) = patch.testimonial_id {
            self.testimonial_id = Some(id);
        }
        merge(&mut self.before_images, patch.before_images);
        merge(&mut self.after_images, patch.after_images);
        merge(&mut self.featured, patch.featured);
    }
}

// ============================================================================
// Meta tags
// ============================================================================

/// Per-page SEO metadata, keyed by a unique page path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTag {
    pub id: i32,
    pub page_path: String,
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewMetaTag {
    pub page_path: String,
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MetaTagPatch {
    pub page_path: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Option<String>>,
    pub og_title: Option<Option<String>>,
    pub og_description: Option<Option<String>>,
    pub og_image: Option<Option<String>>,
    pub twitter_title: Option<Option<String>>,
    pub twitter_description: Option<Option<String>>,
    pub twitter_image: Option<Option<String>>,
}

impl MetaTag {
    pub(crate) fn apply(&mut self, patch: MetaTagPatch) {
        merge(&mut self.page_path, patch.page_path);
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge(&mut self.keywords, patch.keywords);
        merge(&mut self.og_title, patch.og_title);
        merge(&mut self.og_description, patch.og_description);
        merge(&mut self.og_image, patch.og_image);
        merge(&mut self.twitter_title, patch.twitter_title);
        merge(&mut self.twitter_description, patch.twitter_description);
        merge(&mut self.twitter_image, patch.twitter_image);
    }
}

fn merge<T>(field: &mut T, update: Option<T>) {
    if let Some(value) = update {
        *field = value;
    }
}

/// Collapse an empty optional string to `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
