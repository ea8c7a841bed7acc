/// Image hosts reject requests without a gallery referer.
pub const REFERER: &str = "https://photo.yupoo.com/";
