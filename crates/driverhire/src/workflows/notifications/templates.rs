use super::EmailMessage;
use crate::workflows::bookings::Booking;

const SIGNATURE: &str = "Best regards,\nEasyDriverHire Team";

pub const KYC_RECEIVED_SUBJECT: &str = "KYC Documents Received - EasyDriverHire";
pub const KYC_VERIFIED_SUBJECT: &str = "KYC Verified Successfully - EasyDriverHire";
pub const KYC_DECLINED_SUBJECT: &str = "KYC Documents Declined - EasyDriverHire";
pub const BOOKING_REQUEST_SUBJECT: &str = "New Booking Request on EasyDriverHire";

pub fn kyc_received(to: &str, name: Option<&str>) -> EmailMessage {
    let text = format!(
        "Hello {},\n\nWe have received your KYC documents and they are currently under review. \
         We will notify you once the verification process is complete.\n\n\
         Thank you for your patience!\n\n{SIGNATURE}",
        name.unwrap_or("there"),
    );
    message(to, KYC_RECEIVED_SUBJECT, text)
}

pub fn kyc_verified(to: &str, name: Option<&str>, site_url: &str) -> EmailMessage {
    let text = format!(
        "Hello {},\n\nCongratulations! Your KYC has been verified successfully.\n\n\
         You can now access all driver features on our platform. Start accepting bookings \
         and grow your business with us!\n\nGo to your dashboard: {site_url}/drivers/dashboard\n\n\
         {SIGNATURE}",
        name.unwrap_or("there"),
    );
    message(to, KYC_VERIFIED_SUBJECT, text)
}

pub fn kyc_declined(to: &str, name: Option<&str>, site_url: &str) -> EmailMessage {
    let text = format!(
        "Hello {},\n\nUnfortunately, your KYC documents have been declined.\n\n\
         Please review and upload your documents again. Make sure all documents are:\n\
         - Clear and readable\n- Valid and not expired\n- Match the information provided\n\n\
         Resubmit your documents at any time: {site_url}/drivers/kyc\n\n{SIGNATURE}",
        name.unwrap_or("there"),
    );
    message(to, KYC_DECLINED_SUBJECT, text)
}

pub fn booking_request(to: &str, driver_name: Option<&str>, booking: &Booking) -> EmailMessage {
    let text = format!(
        "Hello {},\n\nYou have a new booking request on EasyDriverHire:\n\n\
         Client Name: {}\nEmail: {}\nPhone: {}\nMessage: {}\n\n\
         Please reach out to the client directly to confirm the booking.\n\n{SIGNATURE}",
        driver_name.unwrap_or("Driver"),
        booking.client_name,
        booking.client_email,
        booking.client_phone.as_deref().unwrap_or("N/A"),
        booking.message.as_deref().unwrap_or("N/A"),
    );
    message(to, BOOKING_REQUEST_SUBJECT, text)
}

fn message(to: &str, subject: &str, text: String) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: subject.to_string(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::bookings::{BookingId, BookingStatus};
    use crate::workflows::profiles::ProfileId;
    use chrono::Utc;

    #[test]
    fn kyc_verdicts_link_to_the_right_pages() {
        let verified = kyc_verified("a@example.com", Some("Amina"), "https://edh.test");
        assert!(verified.subject.contains("Verified"));
        assert!(verified.text.contains("Hello Amina"));
        assert!(verified.text.contains("https://edh.test/drivers/dashboard"));

        let declined = kyc_declined("a@example.com", None, "https://edh.test");
        assert!(declined.subject.contains("Declined"));
        assert!(declined.text.contains("Hello there"));
        assert!(declined.text.contains("https://edh.test/drivers/kyc"));
    }

    #[test]
    fn booking_request_fills_missing_contact_details() {
        let now = Utc::now();
        let booking = Booking {
            id: BookingId("bkg-000001".to_string()),
            driver_id: ProfileId("driver-1".to_string()),
            employer_id: None,
            client_name: "Wanjiru".to_string(),
            client_email: "wanjiru@example.com".to_string(),
            client_phone: None,
            message: None,
            status: BookingStatus::requested(),
            created_at: now,
            updated_at: now,
        };

        let email = booking_request("driver@example.com", None, &booking);
        assert_eq!(email.to, "driver@example.com");
        assert!(email.text.starts_with("Hello Driver"));
        assert!(email.text.contains("Client Name: Wanjiru"));
        assert!(email.text.contains("Phone: N/A"));
        assert!(email.text.contains("Message: N/A"));
    }
}
