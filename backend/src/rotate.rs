//! Page rotation expected by the mail-processing vendor.
//!
//! The vendor scans the front page turned 270° clockwise and every following
//! page turned 90°. Only the `/Rotate` attribute of each page changes; the
//! content is not re-flowed.

use lopdf::Document;
use log::{info, warn};

use crate::error::Result;

pub const FRONT_PAGE_ROTATION: i64 = 270;
pub const OTHER_PAGES_ROTATION: i64 = 90;

/// Sets the vendor rotation on every page of `pdf`.
pub fn rotate_pages(pdf: &[u8]) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(pdf)?;
    let pages = doc.get_pages();
    for (page_number, page_id) in pages {
        let rotation = if page_number == 1 {
            FRONT_PAGE_ROTATION
        } else {
            OTHER_PAGES_ROTATION
        };
        doc.get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Rotate", rotation);
    }

    let mut out = Vec::with_capacity(pdf.len());
    doc.save_to(&mut out)?;
    Ok(out)
}

/// Best-effort variant: any failure is logged and the input is returned
/// unchanged.
pub fn rotate_for_mail_vendor(pdf: Vec<u8>) -> Vec<u8> {
    match rotate_pages(&pdf) {
        Ok(rotated) => {
            info!("Applied mail vendor page rotation");
            rotated
        }
        Err(e) => {
            warn!("Page rotation failed, keeping unrotated PDF: {}", e);
            pdf
        }
    }
}
