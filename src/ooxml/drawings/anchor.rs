//! Picture anchors in a spreadsheet drawing part.
//!
//! A drawing (`xl/drawings/drawingN.xml`) places each embedded picture on the
//! cell grid with an anchor block:
//!
//! ```xml
//! <xdr:twoCellAnchor>
//!   <xdr:from><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
//!   <xdr:to>...</xdr:to>
//!   <xdr:pic>... <a:blip r:embed="rId1"/> ...</xdr:pic>
//!   <xdr:clientData/>
//! </xdr:twoCellAnchor>
//! ```
//!
//! Only the top-left `from` marker is used. `absoluteAnchor` blocks have no
//! cell position and are skipped, as are anchors without a picture (shapes,
//! charts, connectors).

use crate::ooxml::drawings::blip::{BlipRef, read_blip_rel_id};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Number of rows on a worksheet grid.
pub const MAX_ROWS: u32 = 1_048_576;
/// Number of columns on a worksheet grid.
pub const MAX_COLS: u32 = 16_384;

/// An embedded picture and the cell its top-left corner sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAnchor {
    /// Zero-based row, as written in `xdr:from/xdr:row`
    pub row: u32,
    /// Zero-based column, as written in `xdr:from/xdr:col`
    pub col: u32,
    /// Relationship id of the picture (`r:embed`, or `r:link`)
    pub r_id: String,
    /// Which blip attribute `r_id` came from
    pub blip: BlipRef,
    /// Position of the anchor in the drawing, in document order
    pub order: usize,
}

impl ImageAnchor {
    /// One-based sheet row number (the row label shown by Excel).
    #[inline]
    pub fn sheet_row(&self) -> u32 {
        self.row.saturating_add(1)
    }

    /// One-based sheet column number.
    #[inline]
    pub fn sheet_col(&self) -> u32 {
        self.col.saturating_add(1)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Coordinate {
    Row,
    Col,
}

#[derive(Default)]
struct AnchorBuilder {
    row: Option<u32>,
    col: Option<u32>,
    r_id: Option<(String, BlipRef)>,
    in_from: bool,
    pic_depth: usize,
    coordinate: Option<Coordinate>,
    text: String,
}

impl AnchorBuilder {
    fn on_start(&mut self, e: &BytesStart<'_>) -> Result<()> {
        match e.local_name().as_ref() {
            b"from" => self.in_from = true,
            b"row" if self.in_from => self.begin_coordinate(Coordinate::Row),
            b"col" if self.in_from => self.begin_coordinate(Coordinate::Col),
            b"pic" => self.pic_depth += 1,
            b"blip" => self.on_blip(e)?,
            _ => {},
        }
        Ok(())
    }

    fn on_empty(&mut self, e: &BytesStart<'_>) -> Result<()> {
        if e.local_name().as_ref() == b"blip" {
            self.on_blip(e)?;
        }
        Ok(())
    }

    fn on_end(&mut self, local_name: &[u8]) {
        match local_name {
            b"from" => self.in_from = false,
            b"row" | b"col" if self.coordinate.is_some() => self.finish_coordinate(),
            b"pic" => self.pic_depth = self.pic_depth.saturating_sub(1),
            _ => {},
        }
    }

    fn on_text(&mut self, text: &[u8]) {
        if self.coordinate.is_some() {
            self.text.push_str(&String::from_utf8_lossy(text));
        }
    }

    fn begin_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = Some(coordinate);
        self.text.clear();
    }

    fn finish_coordinate(&mut self) {
        let value = atoi_simd::parse::<u32, false, false>(self.text.trim().as_bytes()).ok();
        // Positions off the grid are treated as missing
        match self.coordinate.take() {
            Some(Coordinate::Row) => self.row = value.filter(|&row| row < MAX_ROWS),
            Some(Coordinate::Col) => self.col = value.filter(|&col| col < MAX_COLS),
            None => {},
        }
    }

    fn on_blip(&mut self, e: &BytesStart<'_>) -> Result<()> {
        // Picture fills of shapes are not pictures
        if self.pic_depth > 0 && self.r_id.is_none() {
            self.r_id = read_blip_rel_id(e)?;
        }
        Ok(())
    }

    fn finish(self, order: usize) -> Option<ImageAnchor> {
        let Some((r_id, blip)) = self.r_id else {
            log::trace!("Anchor {} has no picture, skipping", order);
            return None;
        };
        match (self.row, self.col) {
            (Some(row), Some(col)) => Some(ImageAnchor {
                row,
                col,
                r_id,
                blip,
                order,
            }),
            _ => {
                log::warn!("Picture anchor {} ({}) has no valid cell position, skipping", order, r_id);
                None
            },
        }
    }
}

/// Extract the picture anchors of a drawing part, in document order.
///
/// Returned coordinates are the raw zero-based values; use
/// [`ImageAnchor::sheet_row`] for the one-based sheet row.
pub fn extract_anchors(drawing_xml: &[u8]) -> Result<Vec<ImageAnchor>> {
    let mut anchors = Vec::new();
    let mut reader = Reader::from_reader(drawing_xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<AnchorBuilder> = None;
    let mut anchor_count = 0usize;
    let mut absolute_depth = 0usize;
    // Anchors inside <mc:Fallback> duplicate the preceding <mc:Choice>
    let mut fallback_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"twoCellAnchor" | b"oneCellAnchor"
                    if current.is_none() && absolute_depth + fallback_depth == 0 =>
                {
                    current = Some(AnchorBuilder::default());
                },
                b"absoluteAnchor" => absolute_depth += 1,
                b"Fallback" if current.is_none() => fallback_depth += 1,
                _ => {
                    if let Some(builder) = current.as_mut() {
                        builder.on_start(e)?;
                    }
                },
            },
            Ok(Event::Empty(ref e)) => {
                if let Some(builder) = current.as_mut() {
                    builder.on_empty(e)?;
                }
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"twoCellAnchor" | b"oneCellAnchor" if absolute_depth + fallback_depth == 0 => {
                    if let Some(builder) = current.take() {
                        if let Some(anchor) = builder.finish(anchor_count) {
                            anchors.push(anchor);
                        }
                        anchor_count += 1;
                    }
                },
                b"absoluteAnchor" => absolute_depth = absolute_depth.saturating_sub(1),
                b"Fallback" if current.is_none() => fallback_depth = fallback_depth.saturating_sub(1),
                local => {
                    if let Some(builder) = current.as_mut() {
                        builder.on_end(local);
                    }
                },
            },
            Ok(Event::Text(ref t)) => {
                if let Some(builder) = current.as_mut() {
                    builder.on_text(t);
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                let position = reader.buffer_position();
                return Err(OoxmlError::Xml(format!(
                    "Drawing parse error at position {}: {}",
                    position, e
                )));
            },
            _ => {},
        }
    }

    log::debug!("Found {} picture anchors in {} anchor blocks", anchors.len(), anchor_count);
    Ok(anchors)
}
