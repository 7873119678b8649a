//! In-memory store for every entity kind the site manages.
//!
//! Each kind lives in its own id-ordered map with its own id counter. Ids are
//! handed out as previous maximum + 1 and never reused, even after deletes.
//! List reads return newest-created records first.

pub mod models;
pub mod seed;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use models::{
    non_empty, BlogPost, BlogPostPatch, ContactSubmission, MetaTag, MetaTagPatch, NewBlogPost,
    NewContactSubmission, NewMetaTag, NewPortfolioProject, NewTestimonial, NewUser,
    PortfolioProject, PortfolioProjectPatch, Testimonial, TestimonialPatch, User,
    DEFAULT_BLOG_CATEGORY,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("page path '{page_path}' is already used by meta tag {existing_id}")]
    PathConflict { page_path: String, existing_id: i32 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record counts per collection, reported by the detailed health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCounts {
    pub users: usize,
    pub contact_submissions: usize,
    pub blog_posts: usize,
    pub testimonials: usize,
    pub portfolio_projects: usize,
    pub meta_tags: usize,
}

/// Ordering information shared by every stored record.
trait Record: Clone {
    fn id(&self) -> i32;

    /// Records without a creation time sort as the oldest.
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl Record for User {
    fn id(&self) -> i32 {
        self.id
    }
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

impl Record for ContactSubmission {
    fn id(&self) -> i32 {
        self.id
    }
    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Record for BlogPost {
    fn id(&self) -> i32 {
        self.id
    }
    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Record for Testimonial {
    fn id(&self) -> i32 {
        self.id
    }
    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Record for PortfolioProject {
    fn id(&self) -> i32 {
        self.id
    }
    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

// Meta tags carry no creation time; they order by insertion alone.
impl Record for MetaTag {
    fn id(&self) -> i32 {
        self.id
    }
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// One entity kind: its records keyed by id plus the id counter.
#[derive(Debug)]
struct Collection<T> {
    entity: &'static str,
    records: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T: Record> Collection<T> {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            records: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, record: T) -> T {
        self.records.insert(record.id(), record.clone());
        record
    }

    fn get(&self, id: i32) -> Option<T> {
        self.records.get(&id).cloned()
    }

    fn get_mut(&mut self, id: i32) -> StoreResult<&mut T> {
        let entity = self.entity;
        self.records
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity, id })
    }

    fn remove(&mut self, id: i32) -> StoreResult<()> {
        match self.records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                entity: self.entity,
                id,
            }),
        }
    }

    /// All records, newest created first. Ids only grow, so the stable sort
    /// keeps insertion order among equal creation times, and records without
    /// a creation time come back in insertion order.
    fn newest_first(&self) -> Vec<T> {
        let mut items: Vec<T> = self.records.values().cloned().collect();
        items.sort_by_key(|record| {
            std::cmp::Reverse(record.created_at().unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
        });
        items
    }

    fn filtered(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.newest_first()
            .into_iter()
            .filter(|record| predicate(record))
            .collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// A refreshed `updated_at` that is strictly later than the previous one.
fn touched(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Process-lifetime store. Construct one per application (or per test) and
/// share it through the application state.
#[derive(Debug)]
pub struct MemStorage {
    users: Collection<User>,
    contact_submissions: Collection<ContactSubmission>,
    blog_posts: Collection<BlogPost>,
    testimonials: Collection<Testimonial>,
    portfolio_projects: Collection<PortfolioProject>,
    meta_tags: Collection<MetaTag>,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStorage {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            users: Collection::new("User"),
            contact_submissions: Collection::new("Contact submission"),
            blog_posts: Collection::new("Blog post"),
            testimonials: Collection::new("Testimonial"),
            portfolio_projects: Collection::new("Portfolio project"),
            meta_tags: Collection::new("Meta tag"),
        }
    }

    /// A store preloaded with the demo content shown on a fresh site.
    pub fn with_seed_data() -> Self {
        let mut store = Self::new();
        seed::load(&mut store);
        store
    }

    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            users: self.users.len(),
            contact_submissions: self.contact_submissions.len(),
            blog_posts: self.blog_posts.len(),
            testimonials: self.testimonials.len(),
            portfolio_projects: self.portfolio_projects.len(),
            meta_tags: self.meta_tags.len(),
        }
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    pub fn get_user(&self, id: i32) -> Option<User> {
        self.users.get(id)
    }

    /// First user with this exact username. Uniqueness is only enforced here,
    /// at lookup time.
    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .records
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    pub fn create_user(&mut self, new: NewUser) -> User {
        let id = self.users.allocate_id();
        self.users.insert(User {
            id,
            username: new.username,
            password: new.password,
        })
    }

    // ------------------------------------------------------------------------
    // Contact submissions
    // ------------------------------------------------------------------------

    pub fn create_contact_submission(&mut self, new: NewContactSubmission) -> ContactSubmission {
        let id = self.contact_submissions.allocate_id();
        self.contact_submissions.insert(ContactSubmission {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            service: new.service,
            message: new.message,
            budget: non_empty(new.budget),
            timeline: non_empty(new.timeline),
            project_scope: non_empty(new.project_scope),
            is_read: false,
            created_at: Utc::now(),
        })
    }

    pub fn get_all_contact_submissions(&self) -> Vec<ContactSubmission> {
        self.contact_submissions.newest_first()
    }

    pub fn get_contact_submission(&self, id: i32) -> Option<ContactSubmission> {
        self.contact_submissions.get(id)
    }

    pub fn mark_contact_submission_as_read(&mut self, id: i32) -> StoreResult<ContactSubmission> {
        let submission = self.contact_submissions.get_mut(id)?;
        submission.is_read = true;
        Ok(submission.clone())
    }

    pub fn delete_contact_submission(&mut self, id: i32) -> StoreResult<()> {
        self.contact_submissions.remove(id)
    }

    // ------------------------------------------------------------------------
    // Blog posts
    // ------------------------------------------------------------------------

    pub fn create_blog_post(&mut self, new: NewBlogPost) -> BlogPost {
        let id = self.blog_posts.allocate_id();
        let now = Utc::now();
        self.blog_posts.insert(BlogPost {
            id,
            title: new.title,
            summary: new.summary,
            content: new.content,
            image_url: non_empty(new.image_url),
            author: new.author,
            category: non_empty(new.category).unwrap_or_else(|| DEFAULT_BLOG_CATEGORY.to_string()),
            tags: new.tags.unwrap_or_default(),
            seo_title: non_empty(new.seo_title),
            seo_description: non_empty(new.seo_description),
            is_published: new.is_published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }

    /// Every post, drafts included.
    pub fn get_all_blog_posts(&self) -> Vec<BlogPost> {
        self.blog_posts.newest_first()
    }

    pub fn get_published_blog_posts(&self) -> Vec<BlogPost> {
        self.blog_posts.filtered(|post| post.is_published)
    }

    /// Published posts whose category matches exactly.
    pub fn get_blog_posts_by_category(&self, category: &str) -> Vec<BlogPost> {
        self.blog_posts
            .filtered(|post| post.is_published && post.category == category)
    }

    /// Published posts where the query appears, case-insensitively, in the
    /// title, summary, content, category or any tag. Unranked.
    pub fn search_blog_posts(&self, query: &str) -> Vec<BlogPost> {
        let needle = query.to_lowercase();
        self.blog_posts.filtered(|post| {
            post.is_published
                && (contains_ignore_case(&post.title, &needle)
                    || contains_ignore_case(&post.summary, &needle)
                    || contains_ignore_case(&post.content, &needle)
                    || contains_ignore_case(&post.category, &needle)
                    || post.tags.iter().any(|tag| contains_ignore_case(tag, &needle)))
        })
    }

    pub fn get_blog_post(&self, id: i32) -> Option<BlogPost> {
        self.blog_posts.get(id)
    }

    pub fn update_blog_post(&mut self, id: i32, patch: BlogPostPatch) -> StoreResult<BlogPost> {
        let post = self.blog_posts.get_mut(id)?;
        post.apply(patch);
        post.updated_at = touched(post.updated_at);
        Ok(post.clone())
    }

    pub fn delete_blog_post(&mut self, id: i32) -> StoreResult<()> {
        self.blog_posts.remove(id)
    }

    // ------------------------------------------------------------------------
    // Testimonials
    // ------------------------------------------------------------------------

    /// Store a submitted testimonial. It stays hidden until approved.
    pub fn create_testimonial(&mut self, new: NewTestimonial) -> Testimonial {
        let id = self.testimonials.allocate_id();
        self.testimonials.insert(Testimonial {
            id,
            client_name: new.client_name,
            company: non_empty(new.company),
            testimonial: new.testimonial,
            rating: new.rating,
            project_type: new.project_type,
            image_url: non_empty(new.image_url),
            is_approved: false,
            created_at: Utc::now(),
        })
    }

    pub fn get_all_testimonials(&self) -> Vec<Testimonial> {
        self.testimonials.newest_first()
    }

    pub fn get_approved_testimonials(&self) -> Vec<Testimonial> {
        self.testimonials.filtered(|t| t.is_approved)
    }

    /// Approved testimonials for one project type.
    pub fn get_testimonials_by_project_type(&self, project_type: &str) -> Vec<Testimonial> {
        self.testimonials
            .filtered(|t| t.is_approved && t.project_type == project_type)
    }

    pub fn get_testimonial(&self, id: i32) -> Option<Testimonial> {
        self.testimonials.get(id)
    }

    pub fn update_testimonial(
        &mut self,
        id: i32,
        patch: TestimonialPatch,
    ) -> StoreResult<Testimonial> {
        let testimonial = self.testimonials.get_mut(id)?;
        testimonial.apply(patch);
        Ok(testimonial.clone())
    }

    pub fn approve_testimonial(&mut self, id: i32) -> StoreResult<Testimonial> {
        let testimonial = self.testimonials.get_mut(id)?;
        testimonial.is_approved = true;
        Ok(testimonial.clone())
    }

    /// Portfolio projects pointing at this testimonial keep their id.
    pub fn delete_testimonial(&mut self, id: i32) -> StoreResult<()> {
        self.testimonials.remove(id)
    }

    // ------------------------------------------------------------------------
    // Portfolio projects
    // ------------------------------------------------------------------------

    pub fn create_portfolio_project(&mut self, new: NewPortfolioProject) -> PortfolioProject {
        let id = self.portfolio_projects.allocate_id();
        let now = Utc::now();
        self.portfolio_projects.insert(PortfolioProject {
            id,
            title: new.title,
            description: new.description,
            category: new.category,
            image_urls: new.image_urls,
            client_name: non_empty(new.client_name),
            completion_date: non_empty(new.completion_date),
            location: non_empty(new.location),
            services: new.services.unwrap_or_default(),
            testimonial_id: new.testimonial_id,
            before_images: new.before_images.unwrap_or_default(),
            after_images: new.after_images.unwrap_or_default(),
            featured: new.featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_all_portfolio_projects(&self) -> Vec<PortfolioProject> {
        self.portfolio_projects.newest_first()
    }

    pub fn get_portfolio_projects_by_category(&self, category: &str) -> Vec<PortfolioProject> {
        self.portfolio_projects
            .filtered(|project| project.category == category)
    }

    pub fn get_featured_portfolio_projects(&self) -> Vec<PortfolioProject> {
        self.portfolio_projects.filtered(|project| project.featured)
    }

    pub fn get_portfolio_project(&self, id: i32) -> Option<PortfolioProject> {
        self.portfolio_projects.get(id)
    }

    pub fn update_portfolio_project(
        &mut self,
        id: i32,
        patch: PortfolioProjectPatch,
    ) -> StoreResult<PortfolioProject> {
        let project = self.portfolio_projects.get_mut(id)?;
        project.apply(patch);
        project.updated_at = touched(project.updated_at);
        Ok(project.clone())
    }

    pub fn delete_portfolio_project(&mut self, id: i32) -> StoreResult<()> {
        self.portfolio_projects.remove(id)
    }

    // ------------------------------------------------------------------------
    // Meta tags
    // ------------------------------------------------------------------------

    /// Fails with `PathConflict` if another record already owns the path.
    pub fn create_meta_tag(&mut self, new: NewMetaTag) -> StoreResult<MetaTag> {
        if let Some(existing) = self.get_meta_tag_by_path(&new.page_path) {
            return Err(StoreError::PathConflict {
                page_path: new.page_path,
                existing_id: existing.id,
            });
        }

        let id = self.meta_tags.allocate_id();
        Ok(self.meta_tags.insert(MetaTag {
            id,
            page_path: new.page_path,
            title: new.title,
            description: new.description,
            keywords: non_empty(new.keywords),
            og_title: non_empty(new.og_title),
            og_description: non_empty(new.og_description),
            og_image: non_empty(new.og_image),
            twitter_title: non_empty(new.twitter_title),
            twitter_description: non_empty(new.twitter_description),
            twitter_image: non_empty(new.twitter_image),
            updated_at: Utc::now(),
        }))
    }

    pub fn get_all_meta_tags(&self) -> Vec<MetaTag> {
        self.meta_tags.newest_first()
    }

    pub fn get_meta_tag(&self, id: i32) -> Option<MetaTag> {
        self.meta_tags.get(id)
    }

    /// First record with this exact page path.
    pub fn get_meta_tag_by_path(&self, page_path: &str) -> Option<MetaTag> {
        self.meta_tags
            .records
            .values()
            .find(|tag| tag.page_path == page_path)
            .cloned()
    }

    /// Fails with `PathConflict` if the patch moves the record onto a path
    /// owned by a different record.
    pub fn update_meta_tag(&mut self, id: i32, patch: MetaTagPatch) -> StoreResult<MetaTag> {
        if let Some(page_path) = &patch.page_path {
            if let Some(existing) = self.get_meta_tag_by_path(page_path) {
                if existing.id != id {
                    return Err(StoreError::PathConflict {
                        page_path: page_path.clone(),
                        existing_id: existing.id,
                    });
                }
            }
        }

        let tag = self.meta_tags.get_mut(id)?;
        tag.apply(patch);
        tag.updated_at = touched(tag.updated_at);
        Ok(tag.clone())
    }

    pub fn delete_meta_tag(&mut self, id: i32) -> StoreResult<()> {
        self.meta_tags.remove(id)
    }
}
