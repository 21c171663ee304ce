//! Deferred image loading.
//!
//! Images carrying the deferred-source attribute are observed; the first time
//! one intersects the viewport its deferred source becomes the real `src`,
//! the attribute is dropped, the image gets the `loaded` class, and the
//! observer lets go of it. There is no retry: a load happens at most once per
//! image. Hosts without intersection observation load everything up front.

use crate::config::LazyConfig;
use crate::dom::{Dom, ElementId, Intersection, ObserverId};
use tracing::{debug, warn};

pub const LOADED_CLASS: &str = "loaded";

#[derive(Debug)]
pub struct LazyLoader {
    attribute: String,
    observer: Option<ObserverId>,
    loaded: usize,
}

impl LazyLoader {
    /// Returns `None` when no image on the page has a deferred source.
    pub fn mount(dom: &mut dyn Dom, config: &LazyConfig) -> Option<Self> {
        let images = dom.query_all(&format!("img[{}]", config.source_attribute));
        if images.is_empty() {
            debug!("no deferred images on page");
            return None;
        }

        let mut loader = Self {
            attribute: config.source_attribute.clone(),
            observer: dom.create_observer(),
            loaded: 0,
        };
        match loader.observer {
            Some(observer) => {
                for &img in &images {
                    dom.observe(observer, img);
                }
                debug!(count = images.len(), "observing deferred images");
            }
            None => {
                warn!("intersection observation unavailable; loading all deferred images");
                for img in images {
                    loader.load(dom, img);
                }
            }
        }
        Some(loader)
    }

    /// Handle an observer callback. Returns `false` if the observer is not
    /// this loader's.
    pub fn on_intersections(
        &mut self,
        dom: &mut dyn Dom,
        observer: ObserverId,
        entries: &[Intersection],
    ) -> bool {
        if self.observer != Some(observer) {
            return false;
        }
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            self.load(dom, entry.target);
            dom.unobserve(observer, entry.target);
        }
        true
    }

    /// Swap in the deferred source. Returns `true` if this call loaded it.
    pub fn load(&mut self, dom: &mut dyn Dom, img: ElementId) -> bool {
        let Some(src) = dom.attribute(img, &self.attribute) else {
            return false;
        };
        dom.set_attribute(img, "src", &src);
        dom.remove_attribute(img, &self.attribute);
        dom.add_class(img, LOADED_CLASS);
        self.loaded += 1;
        true
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimDom;

    fn page(images: usize) -> (SimDom, Vec<ElementId>) {
        let mut dom = SimDom::new(1024);
        let body = dom.body();
        let imgs = (0..images)
            .map(|i| {
                let img = dom.append(body, "img", &[]);
                dom.set_attribute(img, "data-src", &format!("/img/{i}.avif"));
                img
            })
            .collect();
        (dom, imgs)
    }

    fn seen(target: ElementId) -> Intersection {
        Intersection {
            target,
            is_intersecting: true,
        }
    }

    #[test]
    fn no_deferred_images_is_none() {
        let (mut dom, _) = page(0);
        assert!(LazyLoader::mount(&mut dom, &LazyConfig::default()).is_none());
    }

    #[test]
    fn images_wait_for_intersection() {
        let (mut dom, imgs) = page(2);
        let loader = LazyLoader::mount(&mut dom, &LazyConfig::default()).unwrap();
        assert_eq!(loader.loaded(), 0);
        assert_eq!(dom.attribute(imgs[0], "src"), None);
        assert_eq!(dom.observed_count(), 2);
    }

    #[test]
    fn intersection_loads_once_and_unobserves() {
        let (mut dom, imgs) = page(2);
        let mut loader = LazyLoader::mount(&mut dom, &LazyConfig::default()).unwrap();
        let observer = dom.observers_of(imgs[0])[0];

        assert!(loader.on_intersections(&mut dom, observer, &[seen(imgs[0])]));
        assert!(loader.on_intersections(&mut dom, observer, &[seen(imgs[0])]));

        assert_eq!(loader.loaded(), 1);
        assert_eq!(dom.attribute(imgs[0], "src").as_deref(), Some("/img/0.avif"));
        assert_eq!(dom.attribute(imgs[0], "data-src"), None);
        assert!(dom.has_class(imgs[0], LOADED_CLASS));
        assert!(dom.observers_of(imgs[0]).is_empty());
        // The other image never intersected.
        assert_eq!(dom.attribute(imgs[1], "src"), None);
    }

    #[test]
    fn non_intersecting_entries_are_ignored() {
        let (mut dom, imgs) = page(1);
        let mut loader = LazyLoader::mount(&mut dom, &LazyConfig::default()).unwrap();
        let observer = dom.observers_of(imgs[0])[0];
        let entry = Intersection {
            target: imgs[0],
            is_intersecting: false,
        };
        loader.on_intersections(&mut dom, observer, &[entry]);
        assert_eq!(loader.loaded(), 0);
        assert_eq!(dom.observers_of(imgs[0]), vec![observer]);
    }

    #[test]
    fn foreign_observer_is_not_claimed() {
        let (mut dom, imgs) = page(1);
        let mut loader = LazyLoader::mount(&mut dom, &LazyConfig::default()).unwrap();
        let other = dom.create_observer().unwrap();
        assert!(!loader.on_intersections(&mut dom, other, &[seen(imgs[0])]));
        assert_eq!(loader.loaded(), 0);
    }

    #[test]
    fn fallback_loads_everything_immediately() {
        let (mut dom, imgs) = page(3);
        dom.set_intersection_observer(false);
        let loader = LazyLoader::mount(&mut dom, &LazyConfig::default()).unwrap();
        assert_eq!(loader.loaded(), 3);
        for img in imgs {
            assert!(dom.attribute(img, "src").is_some());
        }
    }

    #[test]
    fn custom_source_attribute() {
        let mut dom = SimDom::new(1024);
        let img = dom.append(dom.body(), "img", &[]);
        dom.set_attribute(img, "data-lazy", "/hero.avif");
        dom.set_intersection_observer(false);
        let config = LazyConfig {
            source_attribute: "data-lazy".into(),
        };
        let loader = LazyLoader::mount(&mut dom, &config).unwrap();
        assert_eq!(loader.loaded(), 1);
        assert_eq!(dom.attribute(img, "src").as_deref(), Some("/hero.avif"));
    }
}
