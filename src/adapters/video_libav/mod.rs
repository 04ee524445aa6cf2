//! FFmpeg video sink using libav bindings
//!
//! Turns a sequence of RGB stills into a single-track video stream. Raw
//! fidelity writes `rawvideo` BGR24 frames (AVI); lossy fidelity prefers
//! libx264, then libopenh264 or any other H.264 encoder, then the built-in
//! MPEG-4 Part 2 encoder.

use std::path::PathBuf;

use ffmpeg_next::software::scaling;
use ffmpeg_next::util::error::EAGAIN;
use ffmpeg_next::{codec, encoder, format, frame, Dictionary, Packet, Rational};
use image::RgbImage;
use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::error::{TimelapseError, TimelapseResult};
use crate::ports::*;

const LOSSY_ENCODER_NAMES: &[&str] = &["libx264", "libopenh264"];

/// Factory opening libav-backed video streams
pub struct LibavVideoAdapter;

impl LibavVideoAdapter {
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg_next::init().map_err(|e| TimelapseError::FFmpegInitError {
            message: e.to_string(),
        })?;
        Ok(Self)
    }

    /// Encoder and pixel format for a fidelity
    fn select_codec(fidelity: CodecFidelity) -> TimelapseResult<(ffmpeg_next::Codec, format::Pixel)> {
        match fidelity {
            CodecFidelity::Raw => encoder::find(codec::Id::RAWVIDEO)
                .map(|c| (c, format::Pixel::BGR24))
                .ok_or_else(|| TimelapseError::EncoderUnavailable {
                    message: "rawvideo encoder not found".to_string(),
                }),
            CodecFidelity::Lossy => LOSSY_ENCODER_NAMES
                .iter()
                .find_map(|name| encoder::find_by_name(name))
                .or_else(|| encoder::find(codec::Id::H264))
                .or_else(|| encoder::find(codec::Id::MPEG4))
                .map(|c| (c, format::Pixel::YUV420P))
                .ok_or_else(|| TimelapseError::EncoderUnavailable {
                    message: "no H.264 or MPEG-4 encoder found".to_string(),
                }),
        }
    }

    fn open_stream(spec: &VideoStreamSpec) -> TimelapseResult<LibavVideoSink> {
        let (codec, pixel_format) = Self::select_codec(spec.fidelity)?;
        let FrameGeometry { width, height } = spec.geometry;
        let fps = i32::try_from(spec.frame_rate).map_err(|_| TimelapseError::EncoderUnavailable {
            message: format!("frame rate {} out of range", spec.frame_rate),
        })?;
        let time_base = Rational::new(1, fps);

        let mut octx = format::output(&spec.path)?;
        let global_header = octx
            .format()
            .flags()
            .contains(format::Flags::GLOBAL_HEADER);

        let mut ost = octx.add_stream(codec)?;
        let stream_index = ost.index();

        let mut video = codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;
        video.set_width(width);
        video.set_height(height);
        video.set_format(pixel_format);
        video.set_time_base(time_base);
        video.set_frame_rate(Some(Rational::new(fps, 1)));
        if let Some(bit_rate) = spec.bit_rate {
            video.set_bit_rate(bit_rate);
        }
        if global_header {
            video.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let opened = video.open_with(Dictionary::new())?;
        ost.set_parameters(&opened);
        ost.set_time_base(time_base);

        octx.write_header()?;
        // The muxer may replace the stream time base while writing the header
        let stream_time_base = octx
            .stream(stream_index)
            .map(|s| s.time_base())
            .unwrap_or(time_base);

        let scaler = scaling::Context::get(
            format::Pixel::RGB24,
            width,
            height,
            pixel_format,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        info!(
            path = %spec.path.display(),
            encoder = codec.name(),
            geometry = %spec.geometry,
            fps = spec.frame_rate,
            bit_rate = ?spec.bit_rate,
            "opened video stream"
        );

        Ok(LibavVideoSink {
            octx,
            encoder: opened,
            scaler,
            stream_index,
            encoder_time_base: time_base,
            stream_time_base,
            geometry: spec.geometry,
            next_pts: 0,
            path: spec.path.clone(),
        })
    }
}

impl VideoSinkFactory for LibavVideoAdapter {
    fn open(&self, spec: &VideoStreamSpec) -> Result<Box<dyn VideoSink>, DomainError> {
        let sink = Self::open_stream(spec).map_err(|e| {
            DomainError::EncoderFail(format!(
                "Failed to open {}: {}",
                spec.path.display(),
                e
            ))
        })?;
        Ok(Box::new(sink))
    }
}

/// Open libav output: muxer, encoder and RGB converter
struct LibavVideoSink {
    octx: format::context::Output,
    encoder: encoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    geometry: FrameGeometry,
    next_pts: i64,
    path: PathBuf,
}

impl LibavVideoSink {
    fn encode(&mut self, image: &RgbImage) -> TimelapseResult<()> {
        let FrameGeometry { width, height } = self.geometry;

        let mut rgb = frame::Video::new(format::Pixel::RGB24, width, height);
        let dst_stride = rgb.stride(0);
        let row_bytes = width as usize * 3;
        {
            let src = image.as_raw();
            let dst = rgb.data_mut(0);
            for y in 0..height as usize {
                dst[y * dst_stride..y * dst_stride + row_bytes]
                    .copy_from_slice(&src[y * row_bytes..(y + 1) * row_bytes]);
            }
        }

        let mut converted = frame::Video::empty();
        self.scaler.run(&rgb, &mut converted)?;
        converted.set_pts(Some(self.next_pts));
        self.next_pts += 1;

        self.encoder.send_frame(&converted)?;
        self.drain_packets()
    }

    fn drain_packets(&mut self) -> TimelapseResult<()> {
        let mut packet = Packet::empty();
        while packet_ready(self.encoder.receive_packet(&mut packet))? {
            packet.set_stream(self.stream_index);
            packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
            packet.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }

    fn finish(mut self) -> TimelapseResult<()> {
        self.encoder.send_eof()?;
        self.drain_packets()?;
        self.octx.write_trailer()?;
        debug!(path = %self.path.display(), frames = self.next_pts, "video trailer written");
        Ok(())
    }
}

/// `receive_packet` result: a packet, none pending yet (EAGAIN/EOF), or a failure
fn packet_ready(received: Result<(), ffmpeg_next::Error>) -> TimelapseResult<bool> {
    match received {
        Ok(()) => Ok(true),
        Err(ffmpeg_next::Error::Eof) => Ok(false),
        Err(ffmpeg_next::Error::Other { errno }) if errno == EAGAIN => Ok(false),
        Err(e) => Err(e.into()),
    }
}

impl VideoSink for LibavVideoSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), DomainError> {
        let (width, height) = frame.dimensions();
        if FrameGeometry::new(width, height) != self.geometry {
            return Err(DomainError::EncoderFail(format!(
                "frame is {}x{}, stream is {}",
                width, height, self.geometry
            )));
        }
        let pts = self.next_pts;
        self.encode(frame).map_err(|e| {
            DomainError::EncoderFail(format!(
                "Failed to write frame {} to {}: {}",
                pts,
                self.path.display(),
                e
            ))
        })
    }

    fn close(self: Box<Self>) -> Result<(), DomainError> {
        let path = self.path.clone();
        self.finish().map_err(|e| {
            DomainError::EncoderFail(format!("Failed to finalize {}: {}", path.display(), e))
        })
    }
}
