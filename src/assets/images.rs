// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use async_trait::async_trait;

use crate::host::{BoundImage, ImageDropError, ImageDropTarget, ViewPoint, Viewport};
use crate::layout::GeometryResolver;
use crate::model::{DocumentElement, ElementBody, ImageNode, Point, Rect};
use crate::ops::{Op, Transaction};
use crate::store::DocumentStore;

/// Drops bound images into the document as a row of image elements.
///
/// The drop position arrives in view space and is mapped back through the viewport.
pub struct DocumentImageDrop {
    store: Arc<dyn DocumentStore>,
    viewport: Arc<dyn Viewport>,
    geometry: GeometryResolver,
}

impl DocumentImageDrop {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        viewport: Arc<dyn Viewport>,
        geometry: GeometryResolver,
    ) -> Self {
        Self { store, viewport, geometry }
    }
}

#[async_trait]
impl ImageDropTarget for DocumentImageDrop {
    async fn drop_images(
        &self,
        images: Vec<BoundImage>,
        at: ViewPoint,
    ) -> Result<Vec<crate::model::ElementId>, ImageDropError> {
        if images.is_empty() {
            return Err(ImageDropError::Empty);
        }
        let origin = self.viewport.to_model_coord(at);
        let config = self.geometry.config();
        let step = config.image.w + config.image_spacing;

        let mut txn = Transaction::open(self.store.as_ref(), "drop-images");
        let mut created = Vec::with_capacity(images.len());
        for (index, image) in images.into_iter().enumerate() {
            let image_id = self.store.allocate_id();
            let at = Point::new(origin.x + step * index as f64, origin.y);
            txn.push(Op::create(DocumentElement::new(
                image_id.clone(),
                Rect::from_origin_size(at, config.image),
                ElementBody::Image(ImageNode { asset_id: image.asset_id }),
            )));
            created.push(image_id);
        }
        txn.commit()?;
        tracing::info!(count = created.len(), x = origin.x, y = origin.y, "images dropped");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DocumentImageDrop;
    use crate::assets::AssetBinding;
    use crate::host::{BoundImage, ImageDropError, ImageDropTarget, StaticViewport, ViewPoint};
    use crate::layout::GeometryResolver;
    use crate::model::{AssetId, Point, Rect};
    use crate::ops::ApplyError;
    use crate::store::{DocumentStore, SharedDocument};

    fn target(store: &Arc<SharedDocument>) -> DocumentImageDrop {
        let viewport = StaticViewport::new(None).with_transform(2.0, Point::new(10.0, 0.0));
        DocumentImageDrop::new(store.clone(), Arc::new(viewport), GeometryResolver::default())
    }

    #[tokio::test]
    async fn drops_images_at_model_position_of_view_point() {
        let binding = AssetBinding::new();
        let asset_id = AssetId::new("pic").expect("asset id");
        binding.bind(asset_id.clone(), vec![0u8; 4]);
        let store = Arc::new(SharedDocument::new(binding));

        let images = vec![BoundImage { asset_id: asset_id.clone(), len: 4 }; 2];
        let ids = target(&store).drop_images(images, ViewPoint::new(20.0, 40.0)).await.expect("drop");

        assert_eq!(ids.len(), 2);
        assert_eq!(store.element(&ids[0]).expect("first").bounds(), Rect::new(20.0, 20.0, 400.0, 400.0));
        assert_eq!(store.element(&ids[1]).expect("second").bounds().x, 440.0);
    }

    #[tokio::test]
    async fn unbound_assets_are_rejected() {
        let store = Arc::new(SharedDocument::new(AssetBinding::new()));
        let images = vec![BoundImage { asset_id: AssetId::new("ghost").expect("asset id"), len: 0 }];

        let err = target(&store).drop_images(images, ViewPoint::default()).await.unwrap_err();
        assert!(matches!(err, ImageDropError::Mutation(ApplyError::UnboundAsset { .. })));
        assert!(store.snapshot().is_empty());

        let err = target(&store).drop_images(Vec::new(), ViewPoint::default()).await.unwrap_err();
        assert!(matches!(err, ImageDropError::Empty));
    }
}
