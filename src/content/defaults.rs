//! Built-in seed dataset
//!
//! A key with no durable snapshot is served from these values until its
//! first write.

use crate::content::types::*;

pub fn exhibitions() -> Vec<Exhibition> {
    vec![
        Exhibition {
            id: "exh-1".to_string(),
            title: "Echoes of the Nile".to_string(),
            date_range: "Jan 15 – Jun 30, 2026".to_string(),
            description: "Funerary objects, papyri and jewellery tracing three thousand years of life along the Nile.".to_string(),
            image: "https://images.unsplash.com/photo-1503177119275-0aa32b3a9368?w=1200".to_string(),
            category: "Antiquities".to_string(),
        },
        Exhibition {
            id: "exh-2".to_string(),
            title: "Light and Shadow: Dutch Masters".to_string(),
            date_range: "Mar 1 – Sep 14, 2026".to_string(),
            description: "Interiors, portraits and still lifes from the Golden Age of Dutch painting.".to_string(),
            image: "https://images.unsplash.com/photo-1578301978693-85fa9c0320b9?w=1200".to_string(),
            category: "Painting".to_string(),
        },
        Exhibition {
            id: "exh-3".to_string(),
            title: "Forms in Motion".to_string(),
            date_range: "Apr 10 – Dec 20, 2026".to_string(),
            description: "Twentieth-century sculpture exploring movement, balance and industrial materials.".to_string(),
            image: "https://images.unsplash.com/photo-1554188248-986adbb73be4?w=1200".to_string(),
            category: "Sculpture".to_string(),
        },
        Exhibition {
            id: "exh-4".to_string(),
            title: "Threads of the Silk Road".to_string(),
            date_range: "Permanent collection".to_string(),
            description: "Textiles, ceramics and maps from the trade routes linking East and West.".to_string(),
            image: "https://images.unsplash.com/photo-1582555172866-f73bb12a2ab3?w=1200".to_string(),
            category: "Textiles".to_string(),
        },
    ]
}

pub fn artworks() -> Vec<Artwork> {
    vec![
        Artwork {
            id: "art-1".to_string(),
            title: "Girl Reading a Letter".to_string(),
            artist: "Johannes Vermeer (circle of)".to_string(),
            year: "c. 1660".to_string(),
            medium: "Oil on canvas".to_string(),
            image: "https://images.unsplash.com/photo-1579783902614-a3fb3927b6a5?w=800".to_string(),
        },
        Artwork {
            id: "art-2".to_string(),
            title: "Seated Scribe".to_string(),
            artist: "Unknown".to_string(),
            year: "c. 2500 BC".to_string(),
            medium: "Painted limestone".to_string(),
            image: "https://images.unsplash.com/photo-1566127444979-b3d2b654e3d7?w=800".to_string(),
        },
        Artwork {
            id: "art-3".to_string(),
            title: "Unique Forms".to_string(),
            artist: "Umberto Boccioni (after)".to_string(),
            year: "1913".to_string(),
            medium: "Bronze".to_string(),
            image: "https://images.unsplash.com/photo-1544967082-d9d25d867d66?w=800".to_string(),
        },
        Artwork {
            id: "art-4".to_string(),
            title: "Caravan Map".to_string(),
            artist: "Unknown cartographer".to_string(),
            year: "14th century".to_string(),
            medium: "Ink on vellum".to_string(),
            image: "https://images.unsplash.com/photo-1524661135-423995f22d0b?w=800".to_string(),
        },
    ]
}

pub fn events() -> Vec<MuseumEvent> {
    vec![
        MuseumEvent {
            id: "evt-1".to_string(),
            title: "Curator's Tour: Echoes of the Nile".to_string(),
            date: "Every Saturday".to_string(),
            time: "11:00".to_string(),
            description: "A one-hour walk through the exhibition with its lead curator.".to_string(),
            image: "https://images.unsplash.com/photo-1566127992631-137a642a90f4?w=800".to_string(),
            category: "Tour".to_string(),
        },
        MuseumEvent {
            id: "evt-2".to_string(),
            title: "Family Sketching Morning".to_string(),
            date: "First Sunday of the month".to_string(),
            time: "10:00".to_string(),
            description: "Drawing boards, pencils and prompts in the sculpture hall.".to_string(),
            image: "https://images.unsplash.com/photo-1513364776144-60967b0f800f?w=800".to_string(),
            category: "Family".to_string(),
        },
    ]
}

pub fn collectables() -> Vec<Collectable> {
    vec![
        Collectable {
            id: "col-1".to_string(),
            name: "Scarab Amulet Replica".to_string(),
            price: 2500,
            category: "Replicas".to_string(),
            image: "https://images.unsplash.com/photo-1611652022419-a9419f74343d?w=600".to_string(),
            description: "Hand-cast faience replica of a Middle Kingdom scarab.".to_string(),
            in_stock: None,
        },
        Collectable {
            id: "col-2".to_string(),
            name: "Dutch Masters Catalogue".to_string(),
            price: 4500,
            category: "Books".to_string(),
            image: "https://images.unsplash.com/photo-1544947950-fa07a98d237f?w=600".to_string(),
            description: "Hardback exhibition catalogue, 280 pages.".to_string(),
            in_stock: Some(true),
        },
        Collectable {
            id: "col-3".to_string(),
            name: "Silk Road Scarf".to_string(),
            price: 6000,
            category: "Textiles".to_string(),
            image: "https://images.unsplash.com/photo-1601924994987-69e26d50dc26?w=600".to_string(),
            description: "Printed silk scarf based on a Sogdian textile fragment.".to_string(),
            in_stock: Some(true),
        },
        Collectable {
            id: "col-4".to_string(),
            name: "Bronze Figure Miniature".to_string(),
            price: 12000,
            category: "Replicas".to_string(),
            image: "https://images.unsplash.com/photo-1578926288207-a90a5366759d?w=600".to_string(),
            description: "Limited edition miniature cast in bronze.".to_string(),
            in_stock: Some(false),
        },
    ]
}

pub fn page_assets() -> PageAssets {
    PageAssets {
        home: HomePageAssets {
            hero_title: "Where Every Object Tells a Story".to_string(),
            hero_subtitle: "Five thousand years of art and craft under one roof.".to_string(),
            hero_image: "https://images.unsplash.com/photo-1566054757965-8c4085344c96?w=1600".to_string(),
        },
        about: AboutPageAssets {
            hero_image: "https://images.unsplash.com/photo-1518998053901-5348d3961a04?w=1600".to_string(),
            history: "Founded in 1898 from a private collection of antiquities, the museum now holds over 40,000 objects.".to_string(),
            mission: "To preserve, study and share the material culture of the world with everyone.".to_string(),
            team: vec![
                TeamMember {
                    name: "Amara Okafor".to_string(),
                    role: "Director".to_string(),
                    image: String::new(),
                },
                TeamMember {
                    name: "Lukas Brenner".to_string(),
                    role: "Chief Curator".to_string(),
                    image: String::new(),
                },
                TeamMember {
                    name: "Mei Tanaka".to_string(),
                    role: "Head of Conservation".to_string(),
                    image: String::new(),
                },
            ],
        },
        visit: VisitPageAssets {
            hours: "Tue – Sun, 10:00 – 18:00. Closed Mondays.".to_string(),
            location: "12 Museum Lane, Old Town".to_string(),
            admission: "Adults 5.00, students 2.50, children free.".to_string(),
            hero_image: "https://images.unsplash.com/photo-1575223970966-76ae61ee7838?w=1600".to_string(),
        },
        extra: Default::default(),
    }
}

pub fn gallery_track() -> GalleryTrack {
    GalleryTrack {
        speed: 40,
        direction: ScrollDirection::Left,
        images: artworks().into_iter().map(|a| a.image).collect(),
    }
}
