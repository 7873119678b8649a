//! Demo content loaded into a fresh store so the public pages are not empty.

use super::models::{NewBlogPost, NewMetaTag, NewPortfolioProject, NewTestimonial};
use super::MemStorage;

const UNSPLASH: &str = "https://images.unsplash.com";

fn photo(id: &str, width: u32) -> String {
    format!("{UNSPLASH}/{id}?ixlib=rb-4.0.3&auto=format&fit=crop&w={width}&q=80")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(super) fn load(store: &mut MemStorage) {
    for post in blog_posts() {
        store.create_blog_post(post);
    }

    for testimonial in testimonials() {
        let created = store.create_testimonial(testimonial);
        if let Err(e) = store.approve_testimonial(created.id) {
            tracing::warn!(error = %e, "Failed to approve seeded testimonial");
        }
    }

    for project in portfolio_projects() {
        store.create_portfolio_project(project);
    }

    for tag in meta_tags() {
        if let Err(e) = store.create_meta_tag(tag) {
            tracing::warn!(error = %e, "Skipping seeded meta tag");
        }
    }

    let counts = store.counts();
    tracing::debug!(
        blog_posts = counts.blog_posts,
        testimonials = counts.testimonials,
        portfolio_projects = counts.portfolio_projects,
        meta_tags = counts.meta_tags,
        "Seed data loaded"
    );
}

fn blog_posts() -> Vec<NewBlogPost> {
    vec![
        NewBlogPost {
            title: "The Future of Sustainable Construction".to_string(),
            summary: "Exploring eco-friendly building materials and methods that are shaping the future of construction.".to_string(),
            content: "Sustainable construction is no longer just a trend but a necessity as our industry faces increasing environmental challenges. \
This post looks at the innovations in eco-friendly materials and methods that are transforming how we build.\n\n\
Innovative Materials\nFrom cross-laminated timber to recycled concrete aggregates, sustainable materials reduce our carbon footprint while keeping structural integrity.\n\n\
Energy Efficiency\nPassive house designs and new insulation technologies are drastically reducing energy consumption in residential and commercial buildings.\n\n\
Water Conservation\nSmart water systems and rainwater harvesting are becoming standard features in forward-thinking projects.\n\n\
The Bottom Line\nSustainable construction may cost more upfront, but the long-term savings and environmental benefits make it a wise investment.".to_string(),
            image_url: Some(photo("photo-1503387762-592deb58ef4e", 800)),
            author: "Michael Green".to_string(),
            category: Some("Sustainability".to_string()),
            tags: Some(strings(&["green-building", "innovation", "eco-friendly"])),
            seo_title: Some("The Future of Sustainable Construction: Eco-Friendly Building Solutions".to_string()),
            seo_description: Some("Discover the latest innovations in sustainable construction, from eco-friendly materials to energy-efficient designs.".to_string()),
            is_published: Some(true),
        },
        NewBlogPost {
            title: "5 Tips for Choosing the Right Contractor".to_string(),
            summary: "Essential advice for homeowners looking to hire the perfect contractor for their renovation project.".to_string(),
            content: "Selecting the right contractor is perhaps the most critical decision you'll make in a construction or renovation project.\n\n\
1. Check References and Portfolio\nAsk for references from previous clients and examples of similar projects, and visit completed work if possible.\n\n\
2. Verify Licensing and Insurance\nMake sure your contractor is licensed for the work and carries adequate insurance.\n\n\
3. Get Detailed Quotes\nCompare itemised quotes from several contractors. A quote far below the others often means corners will be cut.\n\n\
4. Establish Clear Communication\nChoose a contractor who communicates clearly and responds promptly.\n\n\
5. Get Everything in Writing\nScope, timeline, payment schedule and change order procedures belong in a detailed contract before work begins.".to_string(),
            image_url: Some(photo("photo-1581094794329-c8112a89af12", 800)),
            author: "Sarah Johnson".to_string(),
            category: Some("Tips".to_string()),
            tags: Some(strings(&["hiring", "renovation", "homeowner-advice"])),
            seo_title: Some("5 Essential Tips for Choosing the Right Contractor for Your Project".to_string()),
            seo_description: Some("Learn how to select the perfect contractor for your renovation with these 5 tips on vetting, comparing quotes and ensuring quality work.".to_string()),
            is_published: Some(true),
        },
        NewBlogPost {
            title: "Modern Home Design Trends for 2023".to_string(),
            summary: "The latest architectural and interior design trends that are defining modern homes this year.".to_string(),
            content: "Several distinctive design trends are emerging in modern home construction and renovation.\n\n\
Biophilic Design\nNatural light, indoor plants and organic materials like stone and wood bring nature into living spaces.\n\n\
Multifunctional Spaces\nHome offices that become guest rooms and living areas that fit exercise equipment are now expected.\n\n\
Smart Home Integration\nHidden charging stations, voice-activated fixtures and integrated automation make technology seamless.\n\n\
Bold Color Choices\nDeep blues, greens and even black are making statements in kitchens and bathrooms.\n\n\
Sustainable Features\nEfficient appliances, solar panels and water-saving fixtures have become design elements in their own right.".to_string(),
            image_url: Some(photo("photo-1600585154340-be6161a56a0c", 800)),
            author: "Emma Richards".to_string(),
            category: Some("Design".to_string()),
            tags: Some(strings(&["trends", "interior-design", "architecture"])),
            seo_title: Some("Top Modern Home Design Trends of 2023: What's Hot in Architecture".to_string()),
            seo_description: Some("Explore the design trends shaping modern homes in 2023, from biophilic elements to smart home technology and bold color choices.".to_string()),
            is_published: Some(true),
        },
    ]
}

fn testimonials() -> Vec<NewTestimonial> {
    let entry = |client: &str, company: &str, text: &str, rating: u8, project_type: &str, image: &str| {
        NewTestimonial {
            client_name: client.to_string(),
            company: Some(company.to_string()),
            testimonial: text.to_string(),
            rating,
            project_type: project_type.to_string(),
            image_url: Some(photo(image, 800)),
        }
    };

    vec![
        entry(
            "John Anderson",
            "Anderson Family",
            "We couldn't be happier with our new home. The attention to detail and quality of workmanship exceeded our expectations, and the project finished on time and on budget.",
            5,
            "Residential",
            "photo-1507003211169-0a1dd7228f2d",
        ),
        entry(
            "Sarah Thompson",
            "Green Earth Organics",
            "The team did an exceptional job on our new eco-friendly retail space. They understood our vision for a sustainable building and helped us achieve LEED certification.",
            5,
            "Commercial",
            "photo-1494790108377-be9c29b29330",
        ),
        entry(
            "Robert Chen",
            "Riverfront Development Corp",
            "As a developer working on multiple projects, I value reliability and expertise. This company consistently delivers high-quality work across our building sites.",
            4,
            "Multi-family",
            "photo-1560250097-0b93528c311a",
        ),
        entry(
            "Patricia Miller",
            "Miller Healthcare Group",
            "Our medical facility renovation had complex requirements and strict timelines. The team delivered a state-of-the-art facility with minimal disruption to our operations.",
            5,
            "Healthcare",
            "photo-1567532939604-b6b5b0db2604",
        ),
    ]
}

fn portfolio_projects() -> Vec<NewPortfolioProject> {
    vec![
        NewPortfolioProject {
            title: "Oakridge Modern Residence".to_string(),
            description: "A 4,500 sq ft custom home featuring sustainable materials, energy-efficient systems, and indoor-outdoor living spaces.".to_string(),
            category: "Residential".to_string(),
            image_urls: vec![
                photo("photo-1600596542815-ffad4c1539a9", 800),
                photo("photo-1600607687939-ce8a6c25118c", 800),
                photo("photo-1600566753086-00f18fb6b3ea", 800),
            ],
            client_name: Some("Anderson Family".to_string()),
            completion_date: Some("June 2022".to_string()),
            location: Some("Portland, OR".to_string()),
            services: Some(strings(&["Architectural Design", "General Contracting", "Interior Design"])),
            testimonial_id: Some(1),
            before_images: Some(vec![photo("photo-1632588036395-f6c4c8827e77", 800)]),
            after_images: Some(vec![photo("photo-1600596542815-ffad4c1539a9", 800)]),
            featured: Some(true),
        },
        NewPortfolioProject {
            title: "Green Earth Retail Center".to_string(),
            description: "A 12,000 sq ft LEED-certified commercial building with solar panels and rainwater harvesting systems.".to_string(),
            category: "Commercial".to_string(),
            image_urls: vec![
                photo("photo-1577495508048-b635879837f1", 800),
                photo("photo-1604014056463-39eabaf4ea6a", 800),
            ],
            client_name: Some("Green Earth Organics".to_string()),
            completion_date: Some("November 2022".to_string()),
            location: Some("Seattle, WA".to_string()),
            services: Some(strings(&["Pre-Construction Planning", "Green Building", "General Contracting"])),
            testimonial_id: Some(2),
            before_images: Some(vec![photo("photo-1523741543316-beb7fc7023d8", 800)]),
            after_images: Some(vec![photo("photo-1577495508048-b635879837f1", 800)]),
            featured: Some(true),
        },
        NewPortfolioProject {
            title: "Riverfront Apartments".to_string(),
            description: "A 45-unit luxury apartment complex with modern amenities, energy-efficient systems, and waterfront views.".to_string(),
            category: "Multi-family".to_string(),
            image_urls: vec![
                photo("photo-1574362848149-11496d93a7c7", 800),
                photo("photo-1580041065738-e72ab61168b5", 800),
            ],
            client_name: Some("Riverfront Development Corp".to_string()),
            completion_date: Some("March 2023".to_string()),
            location: Some("Chicago, IL".to_string()),
            services: Some(strings(&["Construction Management", "Site Development", "General Contracting"])),
            testimonial_id: Some(3),
            featured: Some(false),
            ..Default::default()
        },
        NewPortfolioProject {
            title: "Miller Medical Center".to_string(),
            description: "A 25,000 sq ft medical facility renovation with specialized treatment rooms and patient-focused design.".to_string(),
            category: "Healthcare".to_string(),
            image_urls: vec![
                photo("photo-1629136572950-1908cf566372", 800),
                photo("photo-1584466076520-a59bb34e70a0", 800),
            ],
            client_name: Some("Miller Healthcare Group".to_string()),
            completion_date: Some("January 2023".to_string()),
            location: Some("Boston, MA".to_string()),
            services: Some(strings(&["Specialized Construction", "Renovation", "Facility Upgrading"])),
            testimonial_id: Some(4),
            featured: Some(false),
            ..Default::default()
        },
    ]
}

fn meta_tags() -> Vec<NewMetaTag> {
    let entry = |path: &str, title: &str, description: &str, keywords: &str, og_title: &str, og_description: &str, og_image: &str| {
        NewMetaTag {
            page_path: path.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            keywords: Some(keywords.to_string()),
            og_title: Some(og_title.to_string()),
            og_description: Some(og_description.to_string()),
            og_image: Some(photo(og_image, 1200)),
            ..Default::default()
        }
    };

    vec![
        entry(
            "/",
            "Premium Construction Company | Expert Builders & Contractors",
            "Award-winning construction company specializing in residential, commercial, and sustainable building projects.",
            "construction company, builders, contractors, residential construction, commercial construction",
            "Premium Construction Services | Expert Builders & Contractors",
            "Transform your vision into reality with our award-winning construction services.",
            "photo-1541888946425-d81bb19240f5",
        ),
        entry(
            "/about",
            "About Our Construction Company | Our Story & Values",
            "Learn about our history, values, and commitment to excellence. Meet our team of experienced professionals.",
            "construction company history, about us, construction team, building experts",
            "About Our Construction Company | Our Story & Values",
            "Discover our journey from humble beginnings to industry leaders.",
            "photo-1503387762-592deb58ef4e",
        ),
        entry(
            "/services",
            "Our Construction Services | Residential & Commercial Building",
            "New builds, renovations, design-build, and project management for residential and commercial projects.",
            "construction services, residential construction, commercial building, renovation services",
            "Expert Construction Services for Any Project",
            "From concept to completion, our construction services deliver exceptional results.",
            "photo-1503387762-592deb58ef4e",
        ),
        entry(
            "/portfolio",
            "Construction Portfolio | Our Featured Projects & Case Studies",
            "Browse our portfolio of completed residential homes, commercial buildings, and specialty structures.",
            "construction portfolio, building projects, construction case studies, completed projects",
            "Construction Excellence: Our Featured Projects",
            "Explore our portfolio of luxury homes, commercial developments and specialized structures.",
            "photo-1600596542815-ffad4c1539a9",
        ),
        entry(
            "/blog",
            "Construction Blog | Industry Insights & Building Tips",
            "Industry insights, building tips, sustainable practices, and company news.",
            "construction blog, building tips, construction insights, industry trends",
            "Construction Blog: Expert Insights & Building Tips",
            "Expert advice and the latest industry trends from our construction blog.",
            "photo-1581094794329-c8112a89af12",
        ),
        entry(
            "/contact",
            "Contact Our Construction Company | Get a Free Quote",
            "Contact our construction team for project inquiries, free quotes, or general information.",
            "contact construction company, construction quote, building inquiry",
            "Get in Touch | Start Your Construction Project Today",
            "Contact our team of construction experts for a free consultation and personalized quote.",
            "photo-1600607687939-ce8a6c25118c",
        ),
        entry(
            "/testimonials",
            "Client Testimonials | What Our Customers Say",
            "Read testimonials from satisfied clients about working with our construction company.",
            "construction testimonials, client reviews, customer satisfaction",
            "Our Clients Speak: Construction Testimonials",
            "What our clients say about working with our team on residential and commercial projects.",
            "photo-1507003211169-0a1dd7228f2d",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_contents() {
        let store = MemStorage::with_seed_data();
        let counts = store.counts();

        assert_eq!(counts.blog_posts, 3);
        assert_eq!(counts.testimonials, 4);
        assert_eq!(counts.portfolio_projects, 4);
        assert_eq!(counts.meta_tags, 7);
        assert_eq!(counts.users, 0);
        assert_eq!(counts.contact_submissions, 0);
    }

    #[test]
    fn test_seeded_records_are_public() {
        let store = MemStorage::with_seed_data();

        assert_eq!(store.get_published_blog_posts().len(), 3);
        assert_eq!(store.get_approved_testimonials().len(), 4);
        assert_eq!(store.get_featured_portfolio_projects().len(), 2);
        assert!(store.get_meta_tag_by_path("/testimonials").is_some());
    }

    #[test]
    fn test_seeded_projects_link_testimonials() {
        let store = MemStorage::with_seed_data();
        for project in store.get_all_portfolio_projects() {
            let linked = project.testimonial_id.and_then(|id| store.get_testimonial(id));
            assert!(linked.is_some(), "project {} has no testimonial", project.id);
        }
    }
}
